//! Curator Merge
//!
//! Assembles a product record from two independent extraction sources.
//!
//! # Overview
//!
//! The same logical field can come from a spec-sheet document and from a
//! scraped supplier page, with different reliability per field. The merger
//! picks one value per field according to a configured policy and records
//! which source won.
//!
//! # Architecture
//!
//! ```text
//! document fields ─┐
//!                  ├→ DualSourceMerger → ProductRecord → Standardizer
//! page fields ─────┘
//! ```
//!
//! # Policies
//!
//! - **document-first**: document value unless blank, then page
//! - **page-first**: the reverse
//! - **first-non-empty**: whichever is non-empty; the tiebreak source wins
//!   when both are (document by default)
//!
//! Dimension-like fields default to document-first.

#![warn(missing_docs)]

mod config;
mod error;
mod merger;
mod types;

#[cfg(test)]
mod tests;

pub use config::MergeConfig;
pub use error::MergeError;
pub use merger::{parse_source_sets, DualSourceMerger};
pub use types::{FieldProvenance, MergeOutcome};
