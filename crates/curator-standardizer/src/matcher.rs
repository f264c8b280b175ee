//! Rule matching for a single field value
//!
//! Scanning is linear and first-match-wins over the table's curated order.
//! Do not turn this into best-match or longest-match: existing tables are
//! ordered with this behaviour in mind.

use curator_domain::{Outcome, RuleTable};

/// Delimiters that make a value compound
///
/// The joiner is included so a recombined compound is itself stable.
pub const COMPOUND_DELIMITERS: [&str; 2] = [",", COMPOUND_JOINER];

/// Separator used when recombining resolved compound parts
pub const COMPOUND_JOINER: &str = " & ";

/// Resolves raw field values against one rule table
#[derive(Debug, Clone, Copy)]
pub struct RuleMatcher<'a> {
    table: &'a RuleTable,
}

impl<'a> RuleMatcher<'a> {
    /// Create a matcher over a table
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    /// Resolve a field value, falling back to the title when the value is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::{Outcome, RuleTable};
    /// use curator_standardizer::RuleMatcher;
    ///
    /// let table = RuleTable::from_pairs("installation", [("UNDER", "Undermount")]);
    /// let matcher = RuleMatcher::new(&table);
    ///
    /// assert_eq!(matcher.resolve("under-mount", ""), Outcome::SetValue("Undermount".into()));
    /// assert_eq!(matcher.resolve("", "Undermount sink 600mm"), Outcome::SetValue("Undermount".into()));
    /// assert_eq!(matcher.resolve("Wall hung", ""), Outcome::Unmatched("Wall hung".into()));
    /// ```
    pub fn resolve(&self, current: &str, fallback_title: &str) -> Outcome {
        if current.trim().is_empty() {
            return match self.table.first_match(fallback_title) {
                Some(entry) if entry.is_deletion() => Outcome::Delete,
                Some(entry) => Outcome::SetValue(entry.standard_value.clone()),
                None => Outcome::NoChange,
            };
        }

        if self.table.canonical_value(current).is_some() {
            return Outcome::NoChange;
        }

        if is_compound(current) {
            return self.resolve_compound(current);
        }

        self.resolve_single(current)
    }

    /// Resolve each part independently, then recombine
    ///
    /// Any deleted part deletes the whole field. When no part matches, the
    /// whole value is scanned so learned compound tokens still apply.
    fn resolve_compound(&self, current: &str) -> Outcome {
        let mut resolved: Vec<String> = Vec::new();
        let mut matched = false;

        for part in split_compound(current) {
            match self.resolve_single(part) {
                Outcome::Delete => return Outcome::Delete,
                Outcome::SetValue(value) => {
                    matched = true;
                    resolved.push(value);
                }
                Outcome::NoChange => {
                    matched = true;
                    let canonical = self.table.canonical_value(part).unwrap_or(part);
                    resolved.push(canonical.to_string());
                }
                Outcome::Unmatched(raw) => resolved.push(raw),
            }
        }

        if !matched {
            return match self.table.first_match(current) {
                Some(entry) if entry.is_deletion() => Outcome::Delete,
                Some(entry) => Outcome::SetValue(entry.standard_value.clone()),
                None => Outcome::Unmatched(current.to_string()),
            };
        }

        let mut seen = std::collections::HashSet::new();
        resolved.retain(|value| seen.insert(value.to_uppercase()));

        let joined = resolved.join(COMPOUND_JOINER);
        if joined == current {
            Outcome::NoChange
        } else {
            Outcome::SetValue(joined)
        }
    }

    /// Resolve a non-empty, non-compound value
    ///
    /// An unmatched value is reported as given, surrounding whitespace included.
    fn resolve_single(&self, value: &str) -> Outcome {
        let trimmed = value.trim();
        if self.table.canonical_value(trimmed).is_some() {
            return Outcome::NoChange;
        }

        match self.table.first_match(trimmed) {
            Some(entry) if entry.is_deletion() => Outcome::Delete,
            Some(entry) => Outcome::SetValue(entry.standard_value.clone()),
            None => Outcome::Unmatched(value.to_string()),
        }
    }
}

/// True when the value contains a compound delimiter
pub fn is_compound(value: &str) -> bool {
    COMPOUND_DELIMITERS.iter().any(|d| value.contains(d))
}

/// Split a compound value into trimmed, non-empty parts
pub fn split_compound(value: &str) -> Vec<&str> {
    value
        .split(',')
        .flat_map(|chunk| chunk.split(COMPOUND_JOINER))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
