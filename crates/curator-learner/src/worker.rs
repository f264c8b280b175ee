//! Parallel batch curation with a single promotion point

use crate::{LearnerConfig, LearnerError, PromotionReport, RuleLearner};
use curator_domain::traits::RuleStore;
use curator_domain::{CatalogSnapshot, ProductRecord, UnmatchedValueFlag};
use curator_standardizer::{BatchReport, RowResult, Standardizer};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

/// Batch report plus the promotion that followed it
#[derive(Debug, Clone, Serialize)]
pub struct CurationOutcome {
    /// Per-record results and counters
    pub report: BatchReport,

    /// Flags raised by the batch, with their post-promotion status
    pub flags: Vec<UnmatchedValueFlag>,

    /// Promotion counts; `None` when auto-promotion is off
    pub promotion: Option<PromotionReport>,
}

/// Processes batches in parallel, then promotes flags once
///
/// Each row runs in its own task against a shared read-only snapshot and
/// produces its own result buffer. Rule tables are only appended to after
/// every dispatched row has finished.
///
/// # Examples
///
/// ```no_run
/// use curator_learner::{shutdown_signal, CurationWorker, LearnerConfig};
/// use curator_standardizer::{Standardizer, StandardizerConfig};
/// use curator_store::SqliteRuleStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut store = SqliteRuleStore::new("curator.db")?;
///     let standardizer = Standardizer::new(StandardizerConfig::default())?;
///     let mut worker = CurationWorker::new(standardizer, LearnerConfig::default())?;
///
///     let outcome = worker.run(Vec::new(), &mut store, shutdown_signal()).await?;
///     println!("{}", outcome.report.counters.processed);
///     Ok(())
/// }
/// ```
pub struct CurationWorker {
    standardizer: Arc<Standardizer>,
    learner: RuleLearner,
    max_concurrency: usize,
}

impl CurationWorker {
    /// Create a new worker
    pub fn new(standardizer: Standardizer, config: LearnerConfig) -> Result<Self, LearnerError> {
        config.validate().map_err(LearnerError::Config)?;
        Ok(Self {
            standardizer: Arc::new(standardizer),
            max_concurrency: config.max_concurrency,
            learner: RuleLearner::new(config),
        })
    }

    /// Process a batch against a snapshot without promoting
    ///
    /// Setting the cancel channel to `true` stops dispatch; rows already
    /// dispatched complete and are kept. Results are in input order.
    pub async fn process_batch(
        &self,
        records: Vec<ProductRecord>,
        snapshot: Arc<CatalogSnapshot>,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<BatchReport, LearnerError> {
        self.standardizer.check_snapshot(&snapshot)?;

        let total = records.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks: JoinSet<(usize, RowResult)> = JoinSet::new();
        let mut cancelled = false;

        tracing::info!(
            "Curation batch started ({} records, concurrency {}, snapshot {})",
            total,
            self.max_concurrency,
            snapshot.id
        );

        for (index, record) in records.into_iter().enumerate() {
            if *cancel.borrow() {
                cancelled = true;
                break;
            }

            let permit = tokio::select! {
                permit = semaphore.clone().acquire_owned() => {
                    permit.map_err(|e| LearnerError::Worker(e.to_string()))?
                }
                _ = wait_for_cancel(&mut cancel) => {
                    cancelled = true;
                    break;
                }
            };

            let standardizer = Arc::clone(&self.standardizer);
            let snapshot = Arc::clone(&snapshot);
            tasks.spawn(async move {
                let _permit = permit;
                (index, standardizer.process(&record, &snapshot))
            });
        }

        if cancelled {
            tracing::info!("Cancellation received, waiting for {} dispatched rows", tasks.len());
        }

        let mut slots: Vec<Option<RowResult>> = (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| LearnerError::Worker(e.to_string()))?;
            slots[index] = Some(result);
        }

        let mut report = BatchReport::new(&snapshot);
        for result in slots.into_iter().flatten() {
            report.push(result);
        }
        report.cancelled = cancelled;

        tracing::info!(
            "Curation batch finished: {} processed, {} skipped, {} flagged{}",
            report.counters.processed,
            report.counters.skipped,
            report.counters.flagged,
            if cancelled { " (cancelled)" } else { "" }
        );

        Ok(report)
    }

    /// Load a snapshot from the store, process the batch, then promote
    ///
    /// Promotion happens once, after all rows finish, and only when
    /// `auto_promote` is set.
    pub async fn run<S>(
        &mut self,
        records: Vec<ProductRecord>,
        store: &mut S,
        cancel: watch::Receiver<bool>,
    ) -> Result<CurationOutcome, LearnerError>
    where
        S: RuleStore,
        S::Error: Display,
    {
        let snapshot = store
            .load_snapshot()
            .map_err(|e| LearnerError::Store(e.to_string()))?;

        let report = self.process_batch(records, Arc::new(snapshot), cancel).await?;
        let mut flags: Vec<UnmatchedValueFlag> = report.flags().cloned().collect();

        let promotion = if self.learner.config().auto_promote {
            Some(self.learner.promote_into_store(&mut flags, store)?)
        } else {
            tracing::debug!("Auto-promotion disabled, {} flags left pending", flags.len());
            None
        };

        Ok(CurationOutcome {
            report,
            flags,
            promotion,
        })
    }

    /// The learner used at the promotion point
    pub fn learner(&self) -> &RuleLearner {
        &self.learner
    }
}

/// Resolves once the channel holds `true`; never resolves if the sender is gone
async fn wait_for_cancel(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Cancel channel that flips to `true` on Ctrl+C
pub fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received, stopping dispatch");
            let _ = tx.send(true);
        }
    });
    rx
}
