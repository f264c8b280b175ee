//! Boolean flag derivation from a categorical field
//!
//! Derived flags are a pure function of the categorical value: every flag is
//! recomputed and overwritten on every run. Hand edits to the flags do not
//! persist; edit the categorical field instead.

use crate::config::FlagDefinition;
use curator_domain::rule_table::normalize_token;
use std::collections::BTreeMap;

/// Component separators, tried in order; the first one present is used
pub const COMPONENT_SEPARATORS: [&str; 7] = [" & ", " AND ", ", ", ",", " + ", " / ", "/"];

/// Derives a set of independent boolean flags from one categorical value
#[derive(Debug, Clone, Copy)]
pub struct BooleanDerivationEngine<'a> {
    flags: &'a [FlagDefinition],
}

impl<'a> BooleanDerivationEngine<'a> {
    /// Create an engine over a set of flag definitions
    pub fn new(flags: &'a [FlagDefinition]) -> Self {
        Self { flags }
    }

    /// Compute every flag for a categorical value
    ///
    /// A flag is `true` iff any component contains any of its keywords.
    /// Every defined flag is present in the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_standardizer::{BooleanDerivationEngine, FlagDefinition};
    ///
    /// let flags = vec![
    ///     FlagDefinition::new("is_undermount", "UNDERMOUNT", ["UNDER MOUNT"]),
    ///     FlagDefinition::new("is_topmount", "TOPMOUNT", ["TOP MOUNT"]),
    ///     FlagDefinition::new("is_flushmount", "FLUSHMOUNT", ["FLUSH MOUNT"]),
    /// ];
    /// let derived = BooleanDerivationEngine::new(&flags).derive("Topmount & Undermount");
    ///
    /// assert_eq!(derived["is_undermount"], true);
    /// assert_eq!(derived["is_topmount"], true);
    /// assert_eq!(derived["is_flushmount"], false);
    /// ```
    pub fn derive(&self, categorical: &str) -> BTreeMap<String, bool> {
        let components = split_components(categorical);
        self.flags
            .iter()
            .map(|flag| {
                let keywords = flag.keywords();
                let hit = components
                    .iter()
                    .any(|c| keywords.iter().any(|k| c.contains(k.as_str())));
                (flag.field.clone(), hit)
            })
            .collect()
    }
}

/// Split a categorical value into normalized components
///
/// Uses the first separator (in [`COMPONENT_SEPARATORS`] order) that occurs
/// in the value; with none present the whole value is one component.
pub fn split_components(value: &str) -> Vec<String> {
    let normalized = normalize_token(value);
    if normalized.is_empty() {
        return Vec::new();
    }

    match COMPONENT_SEPARATORS.iter().find(|sep| normalized.contains(**sep)) {
        Some(sep) => normalized
            .split(*sep)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        None => vec![normalized],
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: derivation is deterministic and defines every flag
        #[test]
        fn test_deterministic_and_total(value in ".{0,40}") {
            let flags = vec![
                FlagDefinition::new("is_undermount", "UNDERMOUNT", ["UNDER MOUNT"]),
                FlagDefinition::new("is_topmount", "TOPMOUNT", ["TOP MOUNT"]),
            ];
            let engine = BooleanDerivationEngine::new(&flags);
            let first = engine.derive(&value);
            let second = engine.derive(&value);
            prop_assert_eq!(first.len(), 2);
            prop_assert_eq!(first, second);
        }
    }
}
