//! Catalog snapshot - the immutable rule state a batch runs against

use crate::{DimensionLookup, RuleBook};
use std::fmt;

/// Version tag for a snapshot, based on UUIDv7
///
/// UUIDv7 sorts by creation time, so a later snapshot compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(u128);

impl SnapshotId {
    /// Generate a new UUIDv7-based SnapshotId
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::SnapshotId;
    ///
    /// let id = SnapshotId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a SnapshotId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a SnapshotId from its UUID string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid snapshot id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Creation time in milliseconds since the Unix epoch
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Rule tables plus dimension lookup, frozen for the duration of a batch
///
/// Callers own reload timing: build a new snapshot after the tables change
/// and pass it to subsequent calls. Workers share one snapshot read-only.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    /// Version tag
    pub id: SnapshotId,

    /// Rule tables by domain
    pub rules: RuleBook,

    /// Authoritative dimensions by record key
    pub dimensions: DimensionLookup,
}

impl CatalogSnapshot {
    /// Freeze a rule book and dimension lookup under a fresh id
    pub fn new(rules: RuleBook, dimensions: DimensionLookup) -> Self {
        Self {
            id: SnapshotId::new(),
            rules,
            dimensions,
        }
    }
}
