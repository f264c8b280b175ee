//! Metrics collection for learning runs

use std::collections::BTreeMap;

/// Metrics collected across promotion runs
///
/// Tracks appended and skipped values per rule domain.
#[derive(Debug, Clone, Default)]
pub struct LearnerMetrics {
    /// New entries appended per domain
    pub promoted: BTreeMap<String, usize>,

    /// Flags skipped per domain (token already known, or flag already consumed)
    pub skipped: BTreeMap<String, usize>,

    /// Promotion runs completed
    pub batch_count: usize,

    /// Total time spent promoting, in milliseconds
    pub total_runtime_ms: u64,
}

impl LearnerMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an appended entry
    pub fn record_promotion(&mut self, domain: &str) {
        *self.promoted.entry(domain.to_string()).or_insert(0) += 1;
    }

    /// Record a skipped flag
    pub fn record_skip(&mut self, domain: &str) {
        *self.skipped.entry(domain.to_string()).or_insert(0) += 1;
    }

    /// Record a completed run
    pub fn record_batch(&mut self) {
        self.batch_count += 1;
    }

    /// Appended entries across all domains
    pub fn total_promoted(&self) -> usize {
        self.promoted.values().sum()
    }

    /// Skipped flags across all domains
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        self.promoted.clear();
        self.skipped.clear();
        self.batch_count = 0;
        self.total_runtime_ms = 0;
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Learner Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Promotion runs: {}", self.batch_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
        ];

        if !self.promoted.is_empty() {
            lines.push("Promoted by domain:".to_string());
            for (domain, count) in &self.promoted {
                lines.push(format!("  {}: {}", domain, count));
            }
            lines.push(format!("  Total: {}", self.total_promoted()));
            lines.push(String::new());
        }

        if !self.skipped.is_empty() {
            lines.push("Skipped by domain:".to_string());
            for (domain, count) in &self.skipped {
                lines.push(format!("  {}: {}", domain, count));
            }
            lines.push(format!("  Total: {}", self.total_skipped()));
        }

        lines.join("\n")
    }
}
