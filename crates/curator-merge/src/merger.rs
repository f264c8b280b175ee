//! Dual-source merge

use crate::{FieldProvenance, MergeConfig, MergeError, MergeOutcome};
use curator_domain::{ExtractionSourceSet, FieldMap, FieldValue, ProductRecord};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Reconciles document- and page-derived field sets
#[derive(Debug, Clone, Default)]
pub struct DualSourceMerger {
    config: MergeConfig,
}

impl DualSourceMerger {
    /// Create a merger, validating the configuration
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        config.validate().map_err(MergeError::Config)?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge one record's two source sets
    ///
    /// Fields absent from both sources are omitted. A field present in a
    /// source only as a blank value becomes an explicit `Empty`.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::{ExtractionSource, ExtractionSourceSet, FieldValue};
    /// use curator_merge::{DualSourceMerger, MergeConfig};
    ///
    /// let mut set = ExtractionSourceSet::default();
    /// set.key = "SKU-1".to_string();
    /// set.document.insert("width".to_string(), FieldValue::Number(450.0));
    /// set.page.insert("width".to_string(), FieldValue::Number(455.0));
    /// set.page.insert("colour".to_string(), FieldValue::text("Black"));
    ///
    /// let outcome = DualSourceMerger::new(MergeConfig::default()).unwrap().merge(&set);
    ///
    /// assert_eq!(outcome.record.get("width"), Some(&FieldValue::Number(450.0)));
    /// assert_eq!(outcome.provenance["colour"].source, Some(ExtractionSource::Page));
    /// assert!(outcome.record.get("height").is_none());
    /// ```
    pub fn merge(&self, set: &ExtractionSourceSet) -> MergeOutcome {
        let mut outcome = MergeOutcome {
            record: ProductRecord::new(set.key.clone()),
            provenance: Default::default(),
        };

        let fields: BTreeSet<&String> = set.document.keys().chain(set.page.keys()).collect();
        for field in fields {
            let priority = self.config.priority_for(field);
            let order = priority.order(self.config.tiebreak);

            let winner = order.iter().copied().find_map(|source| {
                set.source(source)
                    .get(field.as_str())
                    .filter(|v| !v.is_blank())
                    .map(|v| (source, v))
            });

            let conflict = match (set.document.get(field.as_str()), set.page.get(field.as_str())) {
                (Some(d), Some(p)) => !d.is_blank() && !p.is_blank() && d != p,
                _ => false,
            };

            let (source, value) = match winner {
                Some((source, value)) => (Some(source), value.clone()),
                None => (None, FieldValue::Empty),
            };

            if conflict {
                debug!(key = %set.key, field = %field, winner = ?source, "Sources disagree");
            }

            outcome.record.set(field.clone(), value);
            outcome.provenance.insert(
                field.clone(),
                FieldProvenance {
                    source,
                    priority,
                    conflict,
                },
            );
        }

        outcome
    }

    /// Merge two bare field maps for a key
    pub fn merge_sources(&self, key: &str, document: FieldMap, page: FieldMap) -> MergeOutcome {
        self.merge(&ExtractionSourceSet {
            key: key.to_string(),
            document,
            page,
        })
    }

    /// Merge many source sets, preserving input order
    #[instrument(skip_all, fields(sets = sets.len()))]
    pub fn merge_all(&self, sets: &[ExtractionSourceSet]) -> Vec<MergeOutcome> {
        let outcomes: Vec<MergeOutcome> = sets.iter().map(|set| self.merge(set)).collect();
        let conflicts: usize = outcomes.iter().map(|o| o.conflicts().count()).sum();
        info!(records = outcomes.len(), conflicts, "Merge complete");
        outcomes
    }
}

/// Parse source sets from JSON: either one object or an array of objects
///
/// Every set must carry a non-blank `key`.
pub fn parse_source_sets(json: &str) -> Result<Vec<ExtractionSourceSet>, MergeError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let sets: Vec<ExtractionSourceSet> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };

    if let Some(index) = sets.iter().position(|s| s.key.trim().is_empty()) {
        return Err(MergeError::MissingKey(index));
    }
    Ok(sets)
}
