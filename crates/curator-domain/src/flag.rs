//! Unmatched-value flags - candidates for rule-table learning

use serde::{Deserialize, Serialize};

/// Why a value was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    /// The value matched no entry in the domain's rule table
    NoRuleMatched,

    /// The domain's rule table could not be loaded
    RuleTableMissing,
}

impl FlagReason {
    /// Short description for reports
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagReason::NoRuleMatched => "no rule matched",
            FlagReason::RuleTableMissing => "rule table missing",
        }
    }
}

/// Lifecycle of a flag
///
/// `Pending` moves to exactly one terminal state and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagStatus {
    /// Awaiting promotion
    #[default]
    Pending,

    /// Appended to its rule table as a new unresolved entry
    Promoted,

    /// The rule table already held the token; nothing appended
    AlreadyKnown,
}

impl FlagStatus {
    /// True once the flag has been consumed by a promotion run
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FlagStatus::Pending)
    }
}

/// A field value that matched no rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedValueFlag {
    /// Key of the record the value came from
    pub record_key: String,

    /// Field holding the value
    pub field: String,

    /// The value as found on the record
    pub raw_value: String,

    /// Rule domain the value should be learned into
    pub rule_domain: String,

    /// Why the value was flagged
    pub reason: FlagReason,

    /// Promotion state
    #[serde(default)]
    pub status: FlagStatus,
}

impl UnmatchedValueFlag {
    /// Create a pending flag
    pub fn new(
        record_key: impl Into<String>,
        field: impl Into<String>,
        raw_value: impl Into<String>,
        rule_domain: impl Into<String>,
        reason: FlagReason,
    ) -> Self {
        Self {
            record_key: record_key.into(),
            field: field.into(),
            raw_value: raw_value.into(),
            rule_domain: rule_domain.into(),
            reason,
            status: FlagStatus::Pending,
        }
    }

    /// Move a pending flag to a terminal state
    ///
    /// Returns `false` if the flag was already terminal; the status is left as is.
    pub fn resolve(&mut self, status: FlagStatus) -> bool {
        if self.status.is_terminal() || !status.is_terminal() {
            return false;
        }
        self.status = status;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag() -> UnmatchedValueFlag {
        UnmatchedValueFlag::new("SKU-1", "installation", "Drop In", "installation", FlagReason::NoRuleMatched)
    }

    #[test]
    fn test_new_flag_is_pending() {
        assert_eq!(flag().status, FlagStatus::Pending);
    }

    #[test]
    fn test_resolution_is_one_way() {
        let mut f = flag();
        assert!(f.resolve(FlagStatus::Promoted));
        assert!(!f.resolve(FlagStatus::AlreadyKnown));
        assert!(!f.resolve(FlagStatus::Pending));
        assert_eq!(f.status, FlagStatus::Promoted);
    }

    #[test]
    fn test_status_defaults_when_missing_from_json() {
        let f: UnmatchedValueFlag = serde_json::from_str(
            r#"{"record_key":"K","field":"material","raw_value":"Granite","rule_domain":"material","reason":"no_rule_matched"}"#,
        )
        .unwrap();
        assert_eq!(f.status, FlagStatus::Pending);
    }
}
