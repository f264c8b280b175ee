//! Field update operations produced by row processing

use curator_domain::{FieldValue, ProductRecord};
use serde::{Deserialize, Serialize};

/// Which stage produced an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// Authoritative dimension from the lookup table
    Dimension,

    /// Rule-table resolution of a governed field
    Rule,

    /// Boolean flag derived from a categorical field (emitted every run)
    Derived,

    /// Value computed from other fields (volume)
    Computed,
}

/// One `field → new value` operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    /// Target field
    pub field: String,

    /// New value; `Empty` clears the field
    pub value: FieldValue,

    /// Producing stage
    pub kind: UpdateKind,
}

impl FieldUpdate {
    /// Create an update
    pub fn new(field: impl Into<String>, value: FieldValue, kind: UpdateKind) -> Self {
        Self {
            field: field.into(),
            value,
            kind,
        }
    }

    /// True when the update clears the field
    pub fn is_clear(&self) -> bool {
        self.value.is_blank()
    }

    /// Apply the update to a record
    pub fn apply(&self, record: &mut ProductRecord) {
        record.set(self.field.clone(), self.value.clone());
    }
}
