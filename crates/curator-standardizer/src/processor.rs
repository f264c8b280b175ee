//! Row processing - one record through every stage
//!
//! Stages run in a fixed order and none is skipped:
//! `Start → DimensionOverride → FieldRuleResolution → BooleanDerivation → Done`.
//! The processor works on a private copy of the record, so rows never observe
//! each other's partial results.

use crate::config::StandardizerConfig;
use crate::derivation::BooleanDerivationEngine;
use crate::diff::{FieldUpdate, UpdateKind};
use crate::dimensions::{apply_volume, DimensionOverride};
use crate::matcher::RuleMatcher;
use curator_domain::{
    CatalogSnapshot, FieldValue, FlagReason, Outcome, ProductRecord, RuleTable, UnmatchedValueFlag,
};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Processing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// Record accepted
    Start,

    /// Authoritative dimensions applied
    DimensionOverride,

    /// Governed fields resolved against rule tables
    FieldRuleResolution,

    /// Boolean flags recomputed
    BooleanDerivation,

    /// Finished
    Done,
}

impl ProcessingStage {
    /// The stage that follows this one
    pub fn next(&self) -> Option<ProcessingStage> {
        match self {
            ProcessingStage::Start => Some(ProcessingStage::DimensionOverride),
            ProcessingStage::DimensionOverride => Some(ProcessingStage::FieldRuleResolution),
            ProcessingStage::FieldRuleResolution => Some(ProcessingStage::BooleanDerivation),
            ProcessingStage::BooleanDerivation => Some(ProcessingStage::Done),
            ProcessingStage::Done => None,
        }
    }
}

/// Why a record was not processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The title (identifying text) is absent or blank
    MissingTitle {
        /// Configured title field
        field: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingTitle { field } => write!(f, "missing title ('{}' is empty)", field),
        }
    }
}

/// Outcome of processing one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowResult {
    /// Record key
    pub key: String,

    /// Updates in the order they were produced
    pub diff: Vec<FieldUpdate>,

    /// Values that matched no rule
    pub flags: Vec<UnmatchedValueFlag>,

    /// Set when the record was rejected before `Start`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,

    /// Recoverable problems (malformed numbers, missing tables)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Stages visited
    pub stages: Vec<ProcessingStage>,
}

impl RowResult {
    fn skipped(key: &str, reason: SkipReason) -> Self {
        Self {
            key: key.to_string(),
            diff: Vec::new(),
            flags: Vec::new(),
            skip_reason: Some(reason),
            warnings: Vec::new(),
            stages: Vec::new(),
        }
    }

    /// True when the record was rejected
    pub fn is_skipped(&self) -> bool {
        self.skip_reason.is_some()
    }

    /// Non-derived updates that set a value
    pub fn updated_count(&self) -> usize {
        self.diff
            .iter()
            .filter(|u| u.kind != UpdateKind::Derived && !u.is_clear())
            .count()
    }

    /// Updates that clear a value
    pub fn cleared_count(&self) -> usize {
        self.diff.iter().filter(|u| u.is_clear()).count()
    }

    /// Updates excluding derived flags
    pub fn changes(&self) -> impl Iterator<Item = &FieldUpdate> {
        self.diff.iter().filter(|u| u.kind != UpdateKind::Derived)
    }

    /// Apply the diff to a record
    pub fn apply_to(&self, record: &mut ProductRecord) {
        for update in &self.diff {
            update.apply(record);
        }
    }
}

/// Runs the stage pipeline for single records against one snapshot
#[derive(Debug, Clone, Copy)]
pub struct RowProcessor<'a> {
    config: &'a StandardizerConfig,
    snapshot: &'a CatalogSnapshot,
}

impl<'a> RowProcessor<'a> {
    /// Create a processor
    pub fn new(config: &'a StandardizerConfig, snapshot: &'a CatalogSnapshot) -> Self {
        Self { config, snapshot }
    }

    /// Process one record
    ///
    /// The input is not modified; use [`RowResult::apply_to`] to commit.
    pub fn process(&self, record: &ProductRecord) -> RowResult {
        if record.is_blank(&self.config.title_field) {
            let reason = SkipReason::MissingTitle {
                field: self.config.title_field.clone(),
            };
            warn!(key = %record.key, "Record skipped: {}", reason);
            return RowResult::skipped(&record.key, reason);
        }

        let mut working = record.clone();
        let mut result = RowResult {
            key: record.key.clone(),
            diff: Vec::new(),
            flags: Vec::new(),
            skip_reason: None,
            warnings: Vec::new(),
            stages: Vec::new(),
        };

        let mut stage = Some(ProcessingStage::Start);
        while let Some(current) = stage {
            match current {
                ProcessingStage::Start | ProcessingStage::Done => {}
                ProcessingStage::DimensionOverride => self.override_dimensions(&mut working, &mut result),
                ProcessingStage::FieldRuleResolution => self.resolve_fields(&mut working, &mut result),
                ProcessingStage::BooleanDerivation => self.derive_flags(&mut working, &mut result),
            }
            debug!(key = %record.key, stage = ?current, "Stage complete");
            result.stages.push(current);
            stage = current.next();
        }

        result
    }

    fn override_dimensions(&self, working: &mut ProductRecord, result: &mut RowResult) {
        let fields = &self.config.dimension_fields;
        let updates =
            DimensionOverride::new(&self.snapshot.dimensions, fields).apply(working, &mut result.warnings);
        result.diff.extend(updates);

        if let Some(volume) = &self.config.volume {
            if let Some(update) = apply_volume(working, fields, volume, &mut result.warnings) {
                result.diff.push(update);
            }
        }
    }

    fn resolve_fields(&self, working: &mut ProductRecord, result: &mut RowResult) {
        for governed in &self.config.governed_fields {
            let (table, reason) = match self.snapshot.rules.table(&governed.domain) {
                Some(table) => (Cow::Borrowed(table), FlagReason::NoRuleMatched),
                None => {
                    let message = format!(
                        "rule table '{}' for field '{}' is missing",
                        governed.domain, governed.field
                    );
                    warn!(key = %working.key, domain = %governed.domain, "Rule table missing, treating as empty");
                    result.warnings.push(message);
                    (Cow::Owned(RuleTable::new(&governed.domain)), FlagReason::RuleTableMissing)
                }
            };

            let current = working.value(&governed.field);
            let title = working.value(&self.config.title_field);
            let outcome = RuleMatcher::new(&table).resolve(&current.as_text(), &title.as_text());

            match outcome {
                Outcome::NoChange => {}
                Outcome::SetValue(standard) => {
                    let value = FieldValue::Text(standard);
                    if current != value {
                        working.set(governed.field.clone(), value.clone());
                        result
                            .diff
                            .push(FieldUpdate::new(governed.field.clone(), value, UpdateKind::Rule));
                    }
                }
                Outcome::Delete => {
                    if current != FieldValue::Empty {
                        working.set(governed.field.clone(), FieldValue::Empty);
                        result
                            .diff
                            .push(FieldUpdate::new(governed.field.clone(), FieldValue::Empty, UpdateKind::Rule));
                    }
                }
                Outcome::Unmatched(raw) => {
                    debug!(key = %working.key, field = %governed.field, value = %raw, "Unmatched value flagged");
                    result.flags.push(UnmatchedValueFlag::new(
                        working.key.clone(),
                        governed.field.clone(),
                        raw,
                        table.domain(),
                        reason,
                    ));
                }
            }
        }
    }

    fn derive_flags(&self, working: &mut ProductRecord, result: &mut RowResult) {
        for group in &self.config.derivations {
            let categorical = working.value(&group.source_field);
            let derived = BooleanDerivationEngine::new(&group.flags).derive(&categorical.as_text());
            for (field, flag) in derived {
                let value = FieldValue::Bool(flag);
                working.set(field.clone(), value.clone());
                result.diff.push(FieldUpdate::new(field, value, UpdateKind::Derived));
            }
        }
    }
}
