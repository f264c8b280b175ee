//! Curator Learner
//!
//! Taxonomy learning and parallel batch curation.
//!
//! # Overview
//!
//! The learner is responsible for:
//! - **Promotion**: appending unmatched values to their rule tables as new,
//!   unresolved entries (blank standard value awaiting curation)
//! - **Parallel batches**: standardizing many records concurrently against
//!   one frozen snapshot
//! - **Single promotion point**: flags from a whole batch are promoted once,
//!   after every row has finished, so appends never race
//! - **Metrics collection**: promoted/skipped counts per domain
//!
//! # Usage
//!
//! ## One-time Promotion
//!
//! ```no_run
//! use curator_learner::RuleLearner;
//! use curator_store::SqliteRuleStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteRuleStore::new("curator.db")?;
//! let mut learner = RuleLearner::default_config();
//!
//! let mut flags = Vec::new();
//! let report = learner.promote_into_store(&mut flags, &mut store)?;
//! println!("promoted {}, skipped {}", report.promoted, report.skipped);
//! println!("{}", learner.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! [learner]
//! dry_run = false
//! auto_promote = true
//! max_concurrency = 4
//! ```
//!
//! Promotion never resolves a flagged record by itself: the record must be
//! reprocessed after the new entry is curated (or left blank, which deletes
//! the value).

#![warn(missing_docs)]

mod config;
mod error;
mod learner;
mod metrics;
mod worker;

pub use config::LearnerConfig;
pub use error::LearnerError;
pub use learner::{PromotionReport, RuleLearner};
pub use metrics::LearnerMetrics;
pub use worker::{shutdown_signal, CurationOutcome, CurationWorker};
