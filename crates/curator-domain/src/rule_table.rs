//! Rule tables - curated search-token → standard-value mappings
//!
//! A table is scanned in order and the first matching entry wins. Order is
//! part of the curated data: two overlapping tokens resolve differently
//! depending on which comes first, and that is intentional.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalize a search token or a value for matching (trim + uppercase)
///
/// # Examples
///
/// ```
/// use curator_domain::rule_table::normalize_token;
///
/// assert_eq!(normalize_token("  Top Mount "), "TOP MOUNT");
/// ```
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Normalize a rule domain name (trim + lowercase)
pub fn normalize_domain(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One row of a rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Normalized search token
    pub search_token: String,

    /// Replacement value; blank means "delete the field"
    pub standard_value: String,
}

impl RuleEntry {
    /// Create an entry, normalizing the search token
    pub fn new(search_token: &str, standard_value: impl Into<String>) -> Self {
        Self {
            search_token: normalize_token(search_token),
            standard_value: standard_value.into().trim().to_string(),
        }
    }

    /// Create an unresolved entry awaiting curation (blank standard value)
    pub fn pending(search_token: &str) -> Self {
        Self::new(search_token, String::new())
    }

    /// True when matching this entry clears the field
    pub fn is_deletion(&self) -> bool {
        self.standard_value.is_empty()
    }
}

/// Ordered rule table for one domain (installation, material, ...)
///
/// Invariant: search tokens are normalized, non-blank and unique
/// (case-insensitively) within the table. Deserialization rebuilds the
/// table entry by entry, so the invariant holds for loaded tables too.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RuleTableDocument")]
pub struct RuleTable {
    domain: String,
    entries: Vec<RuleEntry>,
}

impl RuleTable {
    /// Create an empty table for a domain
    pub fn new(domain: &str) -> Self {
        Self {
            domain: normalize_domain(domain),
            entries: Vec::new(),
        }
    }

    /// Build a table from `(search token, standard value)` pairs
    ///
    /// Blank tokens and later duplicates are dropped; the first occurrence of
    /// a token keeps its position.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::RuleTable;
    ///
    /// let table = RuleTable::from_pairs("installation", [
    ///     ("topmount", "Topmount"),
    ///     ("TOPMOUNT", "Drop-in"),
    ///     ("flushmount", ""),
    /// ]);
    /// assert_eq!(table.len(), 2);
    /// assert_eq!(table.entries()[0].standard_value, "Topmount");
    /// ```
    pub fn from_pairs<I, A, B>(domain: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: Into<String>,
    {
        let mut table = Self::new(domain);
        for (token, standard) in pairs {
            table.push(RuleEntry::new(token.as_ref(), standard));
        }
        table
    }

    /// Domain name (normalized to lowercase)
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Entries in scan order
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry at the end of the table
    ///
    /// Returns `false` (and leaves the table untouched) when the token is
    /// blank or already present.
    pub fn push(&mut self, entry: RuleEntry) -> bool {
        if entry.search_token.is_empty() || self.contains_token(&entry.search_token) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Case-insensitive search-token membership
    pub fn contains_token(&self, raw: &str) -> bool {
        let token = normalize_token(raw);
        self.entries.iter().any(|e| e.search_token == token)
    }

    /// Find a non-blank standard value equal (case-insensitively) to `value`
    ///
    /// Used to recognise values that are already canonical.
    pub fn canonical_value(&self, value: &str) -> Option<&str> {
        let needle = normalize_token(value);
        if needle.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| !e.is_deletion() && normalize_token(&e.standard_value) == needle)
            .map(|e| e.standard_value.as_str())
    }

    /// First entry whose search token is a substring of `text`
    ///
    /// `text` is normalized before scanning. First match wins, not best match.
    pub fn first_match(&self, text: &str) -> Option<&RuleEntry> {
        let haystack = normalize_token(text);
        if haystack.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| haystack.contains(e.search_token.as_str()))
    }
}

/// Wire form of a rule table, normalized on the way in
#[derive(Deserialize)]
struct RuleTableDocument {
    domain: String,
    #[serde(default)]
    entries: Vec<RuleEntry>,
}

impl From<RuleTableDocument> for RuleTable {
    fn from(doc: RuleTableDocument) -> Self {
        Self::from_pairs(
            &doc.domain,
            doc.entries.into_iter().map(|e| (e.search_token, e.standard_value)),
        )
    }
}

/// All rule tables known to a run, keyed by domain
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RuleBookDocument")]
pub struct RuleBook {
    tables: BTreeMap<String, RuleTable>,
}

/// Wire form of a rule book; tables are re-keyed by their normalized domain
#[derive(Deserialize)]
struct RuleBookDocument {
    #[serde(default)]
    tables: BTreeMap<String, RuleTable>,
}

impl From<RuleBookDocument> for RuleBook {
    fn from(doc: RuleBookDocument) -> Self {
        let mut book = RuleBook::new();
        for table in doc.tables.into_values() {
            let target = book.table_mut_or_create(table.domain());
            for entry in table.entries {
                target.push(entry);
            }
        }
        book
    }
}

impl RuleBook {
    /// Create an empty rule book
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a table under its domain
    pub fn insert(&mut self, table: RuleTable) {
        self.tables.insert(table.domain().to_string(), table);
    }

    /// Builder-style insert
    pub fn with_table(mut self, table: RuleTable) -> Self {
        self.insert(table);
        self
    }

    /// Look up the table for a domain
    pub fn table(&self, domain: &str) -> Option<&RuleTable> {
        self.tables.get(&normalize_domain(domain))
    }

    /// Mutable table for a domain, created empty if missing
    pub fn table_mut_or_create(&mut self, domain: &str) -> &mut RuleTable {
        let key = normalize_domain(domain);
        self.tables
            .entry(key.clone())
            .or_insert_with(|| RuleTable::new(&key))
    }

    /// Domain names in sorted order
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Iterate over all tables
    pub fn tables(&self) -> impl Iterator<Item = &RuleTable> {
        self.tables.values()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True when no tables are loaded
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
