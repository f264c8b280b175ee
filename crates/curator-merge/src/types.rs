//! Merge result types

use curator_domain::{ExtractionSource, FieldPriority, ProductRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where a merged field's value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldProvenance {
    /// Winning source; `None` when every present value was blank
    pub source: Option<ExtractionSource>,

    /// Policy applied to the field
    pub priority: FieldPriority,

    /// Both sources had different non-empty values
    pub conflict: bool,
}

/// A merged record plus per-field provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    /// Fields produced by at least one source
    pub record: ProductRecord,

    /// Provenance for every field in `record`
    pub provenance: BTreeMap<String, FieldProvenance>,
}

impl MergeOutcome {
    /// Fields whose sources disagreed
    pub fn conflicts(&self) -> impl Iterator<Item = &str> {
        self.provenance
            .iter()
            .filter(|(_, p)| p.conflict)
            .map(|(field, _)| field.as_str())
    }

    /// Number of fields taken from one source
    pub fn count_from(&self, source: ExtractionSource) -> usize {
        self.provenance
            .values()
            .filter(|p| p.source == Some(source))
            .count()
    }

    /// Fold the merged fields into an existing record
    ///
    /// Only fields the extraction produced are written; explicit `Empty`
    /// values clear the target field.
    pub fn apply_to(&self, record: &mut ProductRecord) {
        for (field, value) in &self.record.fields {
            record.set(field.clone(), value.clone());
        }
    }
}
