//! Rule resolution outcome

/// Result of resolving one field value against a rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Value is already canonical, or nothing applies
    NoChange,

    /// Replace the field with this standard value
    SetValue(String),

    /// Clear the field (matched a deletion rule)
    Delete,

    /// Non-empty value matched no rule; candidate for learning
    Unmatched(String),
}
