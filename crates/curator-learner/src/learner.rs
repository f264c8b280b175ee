//! Rule learning: promoting unmatched values into rule tables

use crate::{LearnerConfig, LearnerError, LearnerMetrics};
use curator_domain::rule_table::{normalize_domain, normalize_token};
use curator_domain::traits::RuleStore;
use curator_domain::{FlagStatus, RuleBook, RuleEntry, UnmatchedValueFlag};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::time::Instant;
use tracing::{debug, info};

/// Counts from one promotion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PromotionReport {
    /// New entries appended (or that would be, in dry-run mode)
    pub promoted: usize,

    /// Flags that appended nothing
    pub skipped: usize,
}

/// Appends unmatched values to rule tables as unresolved entries
///
/// Appends are append-only: an existing standard value is never edited.
/// Each appended entry has a blank standard value until a person curates
/// it; left blank, it deletes the value on the next run.
///
/// # Examples
///
/// ```
/// use curator_domain::{FlagReason, RuleBook, UnmatchedValueFlag};
/// use curator_learner::RuleLearner;
///
/// let mut rules = RuleBook::new();
/// let mut flags = vec![UnmatchedValueFlag::new(
///     "SKU-1", "material", "Fireclay", "material", FlagReason::NoRuleMatched,
/// )];
///
/// let mut learner = RuleLearner::default_config();
/// let report = learner.promote(&mut flags, &mut rules).unwrap();
///
/// assert_eq!(report.promoted, 1);
/// assert!(rules.table("material").unwrap().contains_token("fireclay"));
/// ```
pub struct RuleLearner {
    config: LearnerConfig,
    metrics: LearnerMetrics,
}

impl RuleLearner {
    /// Create a new learner with the given configuration
    pub fn new(config: LearnerConfig) -> Self {
        Self {
            config,
            metrics: LearnerMetrics::new(),
        }
    }

    /// Create a learner with default configuration
    pub fn default_config() -> Self {
        Self::new(LearnerConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &LearnerMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Promote flags into an in-memory rule book
    ///
    /// Missing tables are created.
    pub fn promote(
        &mut self,
        flags: &mut [UnmatchedValueFlag],
        rules: &mut RuleBook,
    ) -> Result<PromotionReport, LearnerError> {
        let dry_run = self.config.dry_run;
        self.promote_with(flags, |domain, entry| {
            if dry_run {
                Ok(!rules
                    .table(domain)
                    .is_some_and(|t| t.contains_token(&entry.search_token)))
            } else {
                Ok(rules.table_mut_or_create(domain).push(entry))
            }
        })
    }

    /// Promote flags into a rule store
    pub fn promote_into_store<S>(
        &mut self,
        flags: &mut [UnmatchedValueFlag],
        store: &mut S,
    ) -> Result<PromotionReport, LearnerError>
    where
        S: RuleStore,
        S::Error: Display,
    {
        let dry_run = self.config.dry_run;
        self.promote_with(flags, |domain, entry| {
            if dry_run {
                let known = store
                    .load_table(domain)
                    .map_err(|e| LearnerError::Store(e.to_string()))?
                    .is_some_and(|t| t.contains_token(&entry.search_token));
                Ok(!known)
            } else {
                store
                    .append_rule(domain, entry)
                    .map_err(|e| LearnerError::Store(e.to_string()))
            }
        })
    }

    /// Shared promotion loop
    ///
    /// `append` returns whether the entry is new. Pending flags move to
    /// `Promoted` or `AlreadyKnown`; terminal flags are skipped untouched.
    /// In dry-run mode flag status is left as is.
    fn promote_with<F>(
        &mut self,
        flags: &mut [UnmatchedValueFlag],
        mut append: F,
    ) -> Result<PromotionReport, LearnerError>
    where
        F: FnMut(&str, RuleEntry) -> Result<bool, LearnerError>,
    {
        let start = Instant::now();
        let mut report = PromotionReport::default();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for flag in flags.iter_mut() {
            let domain = normalize_domain(&flag.rule_domain);
            let token = normalize_token(&flag.raw_value);

            if flag.status.is_terminal() || token.is_empty() || domain.is_empty() {
                debug!(key = %flag.record_key, field = %flag.field, status = ?flag.status, "Flag skipped");
                report.skipped += 1;
                self.metrics.record_skip(&domain);
                continue;
            }

            let first_in_run = seen.insert((domain.clone(), token.clone()));
            let appended = first_in_run && append(&domain, RuleEntry::pending(&token))?;

            if appended {
                debug!(domain = %domain, token = %token, "Rule entry appended");
                report.promoted += 1;
                self.metrics.record_promotion(&domain);
                if !self.config.dry_run {
                    flag.resolve(FlagStatus::Promoted);
                }
            } else {
                report.skipped += 1;
                self.metrics.record_skip(&domain);
                if !self.config.dry_run {
                    flag.resolve(FlagStatus::AlreadyKnown);
                }
            }
        }

        self.metrics.record_batch();
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        info!(
            promoted = report.promoted,
            skipped = report.skipped,
            dry_run = self.config.dry_run,
            "Promotion complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::{FlagReason, RuleTable};

    fn flag(domain: &str, raw: &str) -> UnmatchedValueFlag {
        UnmatchedValueFlag::new("SKU-1", domain, raw, domain, FlagReason::NoRuleMatched)
    }

    #[test]
    fn test_promote_appends_blank_entry_at_end() {
        let mut rules = RuleBook::new().with_table(RuleTable::from_pairs("material", [("STAINLESS", "Stainless Steel")]));
        let mut flags = vec![flag("material", "Fireclay")];

        let report = RuleLearner::default_config().promote(&mut flags, &mut rules).unwrap();

        assert_eq!(report, PromotionReport { promoted: 1, skipped: 0 });
        let table = rules.table("material").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1].search_token, "FIRECLAY");
        assert!(table.entries()[1].is_deletion());
        assert_eq!(flags[0].status, FlagStatus::Promoted);
    }

    #[test]
    fn test_promoting_twice_appends_once() {
        let mut rules = RuleBook::new();
        let mut learner = RuleLearner::default_config();

        let mut first = vec![flag("material", "Fireclay")];
        let mut second = vec![flag("material", "FIRECLAY ")];

        assert_eq!(learner.promote(&mut first, &mut rules).unwrap().promoted, 1);
        let report = learner.promote(&mut second, &mut rules).unwrap();

        assert_eq!(report, PromotionReport { promoted: 0, skipped: 1 });
        assert_eq!(rules.table("material").unwrap().len(), 1);
        assert_eq!(second[0].status, FlagStatus::AlreadyKnown);
        assert_eq!(learner.metrics().batch_count, 2);
    }

    #[test]
    fn test_duplicates_within_one_run() {
        let mut rules = RuleBook::new();
        let mut flags = vec![flag("grade", "316L"), flag("grade", "316l"), flag("style", "316L")];

        let report = RuleLearner::default_config().promote(&mut flags, &mut rules).unwrap();

        assert_eq!(report, PromotionReport { promoted: 2, skipped: 1 });
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_existing_standard_value_is_never_edited() {
        let mut rules = RuleBook::new().with_table(RuleTable::from_pairs("material", [("GRANITE", "Granite Composite")]));
        let mut flags = vec![flag("material", "granite")];

        RuleLearner::default_config().promote(&mut flags, &mut rules).unwrap();

        let table = rules.table("material").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].standard_value, "Granite Composite");
    }

    #[test]
    fn test_terminal_flags_are_skipped() {
        let mut rules = RuleBook::new();
        let mut consumed = flag("material", "Fireclay");
        consumed.resolve(FlagStatus::Promoted);
        let mut flags = vec![consumed];

        let report = RuleLearner::default_config().promote(&mut flags, &mut rules).unwrap();

        assert_eq!(report.skipped, 1);
        assert!(rules.is_empty());
    }

    #[test]
    fn test_dry_run_leaves_everything_untouched() {
        let mut rules = RuleBook::new();
        let mut flags = vec![flag("material", "Fireclay"), flag("material", "fireclay")];

        let report = RuleLearner::new(LearnerConfig::conservative())
            .promote(&mut flags, &mut rules)
            .unwrap();

        assert_eq!(report, PromotionReport { promoted: 1, skipped: 1 });
        assert!(rules.is_empty());
        assert!(flags.iter().all(|f| f.status == FlagStatus::Pending));
    }

    #[test]
    fn test_promoted_compound_value_resolves_on_rerun() {
        use curator_domain::Outcome;
        use curator_standardizer::RuleMatcher;

        let mut rules = RuleBook::new().with_table(RuleTable::from_pairs("installation", [("UNDERMOUNT", "Undermount")]));
        let table = rules.table("installation").unwrap().clone();
        let outcome = RuleMatcher::new(&table).resolve("Wall hung, Freestanding", "");
        let Outcome::Unmatched(raw) = outcome else {
            panic!("expected an unmatched compound value, got {:?}", outcome);
        };

        let mut flags = vec![flag("installation", &raw)];
        RuleLearner::default_config().promote(&mut flags, &mut rules).unwrap();

        let table = rules.table("installation").unwrap();
        assert_eq!(table.entries()[1].search_token, "WALL HUNG, FREESTANDING");
        assert_eq!(RuleMatcher::new(table).resolve("Wall hung, Freestanding", ""), Outcome::Delete);
    }
}
