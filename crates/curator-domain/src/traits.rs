//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{CatalogSnapshot, DimensionLookup, RuleBook, RuleEntry, RuleTable};

/// Trait for loading and extending rule tables
///
/// Implemented by the infrastructure layer (curator-store)
pub trait RuleStore {
    /// Error type for store operations
    type Error;

    /// Names of all domains that have a table
    fn domains(&self) -> Result<Vec<String>, Self::Error>;

    /// Load one domain's table in scan order, `None` if the domain is unknown
    fn load_table(&self, domain: &str) -> Result<Option<RuleTable>, Self::Error>;

    /// Append an entry at the end of a domain's table
    ///
    /// Returns `false` when the search token already exists (case-insensitively).
    /// Existing standard values are never modified.
    fn append_rule(&mut self, domain: &str, entry: RuleEntry) -> Result<bool, Self::Error>;

    /// Load the dimension reference table
    fn load_dimensions(&self) -> Result<DimensionLookup, Self::Error>;

    /// Load every table plus the dimension lookup as one frozen snapshot
    fn load_snapshot(&self) -> Result<CatalogSnapshot, Self::Error> {
        let mut rules = RuleBook::new();
        for domain in self.domains()? {
            if let Some(table) = self.load_table(&domain)? {
                rules.insert(table);
            }
        }
        Ok(CatalogSnapshot::new(rules, self.load_dimensions()?))
    }
}
