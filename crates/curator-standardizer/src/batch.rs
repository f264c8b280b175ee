//! Batch and interactive invocation

use crate::config::StandardizerConfig;
use crate::processor::{RowProcessor, RowResult};
use crate::StandardizerError;
use curator_domain::traits::RuleStore;
use curator_domain::{CatalogSnapshot, ProductRecord, UnmatchedValueFlag};
use serde::Serialize;
use std::fmt::Display;
use tracing::{info, instrument};

/// Aggregate counters for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchCounters {
    /// Records that went through every stage
    pub processed: usize,

    /// Records rejected before processing
    pub skipped: usize,

    /// Value-setting updates, excluding derived flags
    pub updated: usize,

    /// Value-clearing updates
    pub cleared: usize,

    /// Unmatched-value flags raised
    pub flagged: usize,
}

impl BatchCounters {
    /// Fold one row result into the counters
    pub fn record(&mut self, result: &RowResult) {
        if result.is_skipped() {
            self.skipped += 1;
            return;
        }
        self.processed += 1;
        self.updated += result.updated_count();
        self.cleared += result.cleared_count();
        self.flagged += result.flags.len();
    }
}

/// Per-record results plus aggregate counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Snapshot the batch ran against
    pub snapshot_id: String,

    /// One result per input record, in input order
    pub results: Vec<RowResult>,

    /// Totals
    pub counters: BatchCounters,

    /// True when dispatch stopped before every record was processed
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl BatchReport {
    /// Empty report for a snapshot
    pub fn new(snapshot: &CatalogSnapshot) -> Self {
        Self {
            snapshot_id: snapshot.id.to_string(),
            ..Self::default()
        }
    }

    /// Append a row result and update the counters
    pub fn push(&mut self, result: RowResult) {
        self.counters.record(&result);
        self.results.push(result);
    }

    /// All flags raised in the batch
    pub fn flags(&self) -> impl Iterator<Item = &UnmatchedValueFlag> {
        self.results.iter().flat_map(|r| r.flags.iter())
    }
}

/// Entry point for standardizing records
#[derive(Debug, Clone)]
pub struct Standardizer {
    config: StandardizerConfig,
}

impl Standardizer {
    /// Create a standardizer, validating the configuration
    pub fn new(config: StandardizerConfig) -> Result<Self, StandardizerError> {
        config.validate().map_err(StandardizerError::Config)?;
        Ok(Self { config })
    }

    /// The active configuration
    pub fn config(&self) -> &StandardizerConfig {
        &self.config
    }

    /// Fail when rules are governed but the snapshot holds no table at all
    ///
    /// Evaluating against nothing would flag every value as unmatched.
    pub fn check_snapshot(&self, snapshot: &CatalogSnapshot) -> Result<(), StandardizerError> {
        if !self.config.governed_fields.is_empty() && snapshot.rules.is_empty() {
            return Err(StandardizerError::NoRuleTables(self.config.governed_fields.len()));
        }
        Ok(())
    }

    /// Process one record against a snapshot
    pub fn process(&self, record: &ProductRecord, snapshot: &CatalogSnapshot) -> RowResult {
        RowProcessor::new(&self.config, snapshot).process(record)
    }

    /// Process a batch sequentially against one snapshot
    ///
    /// A skipped record does not affect the others.
    #[instrument(skip_all, fields(records = records.len(), snapshot = %snapshot.id))]
    pub fn process_batch(
        &self,
        records: &[ProductRecord],
        snapshot: &CatalogSnapshot,
    ) -> Result<BatchReport, StandardizerError> {
        self.check_snapshot(snapshot)?;

        let processor = RowProcessor::new(&self.config, snapshot);
        let mut report = BatchReport::new(snapshot);
        for record in records {
            report.push(processor.process(record));
        }

        let c = &report.counters;
        info!(
            processed = c.processed,
            skipped = c.skipped,
            updated = c.updated,
            cleared = c.cleared,
            flagged = c.flagged,
            "Batch complete"
        );
        Ok(report)
    }

    /// Reload rules from a store, then process one record
    ///
    /// For interactive single-record runs that should never see stale tables.
    pub fn process_fresh<S>(&self, record: &ProductRecord, store: &S) -> Result<RowResult, StandardizerError>
    where
        S: RuleStore,
        S::Error: Display,
    {
        let snapshot = store
            .load_snapshot()
            .map_err(|e| StandardizerError::Store(e.to_string()))?;
        self.check_snapshot(&snapshot)?;
        Ok(self.process(record, &snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::{DimensionLookup, RuleBook, RuleTable};

    fn snapshot() -> CatalogSnapshot {
        let rules = RuleBook::new().with_table(RuleTable::from_pairs(
            "installation",
            [("TOPMOUNT", "Topmount"), ("FLUSHMOUNT", "")],
        ));
        CatalogSnapshot::new(rules, DimensionLookup::new())
    }

    fn standardizer() -> Standardizer {
        let mut config = StandardizerConfig::default();
        config.governed_fields.truncate(1);
        Standardizer::new(config).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = StandardizerConfig::default();
        config.title_field = String::new();
        assert!(matches!(Standardizer::new(config), Err(StandardizerError::Config(_))));
    }

    #[test]
    fn test_counters() {
        let records = vec![
            ProductRecord::new("A").with_field("title", "x").with_field("installation", "topmount kit"),
            ProductRecord::new("B").with_field("title", "y").with_field("installation", "Flushmount"),
            ProductRecord::new("C"),
            ProductRecord::new("D").with_field("title", "z").with_field("installation", "Wall hung"),
        ];
        let report = standardizer().process_batch(&records, &snapshot()).unwrap();

        assert_eq!(
            report.counters,
            BatchCounters {
                processed: 3,
                skipped: 1,
                updated: 1,
                cleared: 1,
                flagged: 1,
            }
        );
        assert_eq!(report.flags().count(), 1);
        assert_eq!(report.results.len(), 4);
    }

    #[test]
    fn test_empty_snapshot_is_fatal() {
        let empty = CatalogSnapshot::new(RuleBook::new(), DimensionLookup::new());
        let records = vec![ProductRecord::new("A").with_field("title", "x")];
        assert!(matches!(
            standardizer().process_batch(&records, &empty),
            Err(StandardizerError::NoRuleTables(1))
        ));
    }

    #[test]
    fn test_empty_snapshot_allowed_without_governed_fields() {
        let standardizer = Standardizer::new(StandardizerConfig::minimal()).unwrap();
        let empty = CatalogSnapshot::new(RuleBook::new(), DimensionLookup::new());
        let records = vec![ProductRecord::new("A").with_field("title", "x")];
        let report = standardizer.process_batch(&records, &empty).unwrap();
        assert_eq!(report.counters.processed, 1);
    }
}
