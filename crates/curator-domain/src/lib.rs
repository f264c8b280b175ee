//! Curator Domain Layer
//!
//! Core data model for catalog standardization. Pure types and trait seams
//! only; all I/O lives in other crates.
//!
//! ## Key Concepts
//!
//! - **ProductRecord**: One catalog entry, a map of field name → scalar value
//! - **RuleTable**: Ordered search-token → standard-value mapping per domain
//!   (first match wins; a blank standard value means "delete")
//! - **DimensionLookup**: Authoritative length/width/depth keyed by record key
//! - **UnmatchedValueFlag**: A value that matched no rule, awaiting promotion
//! - **CatalogSnapshot**: Rule tables and dimensions frozen for one batch
//!
//! ## Architecture
//!
//! - Only `uuid` and `serde` as external dependencies
//! - Infrastructure (SQLite, files) implements the traits in [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dimension;
pub mod field;
pub mod flag;
pub mod outcome;
pub mod record;
pub mod rule_table;
pub mod snapshot;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use dimension::{Dimension, DimensionEntry, DimensionLookup};
pub use field::FieldValue;
pub use flag::{FlagReason, FlagStatus, UnmatchedValueFlag};
pub use outcome::Outcome;
pub use record::{FieldMap, ProductRecord};
pub use rule_table::{RuleBook, RuleEntry, RuleTable};
pub use snapshot::{CatalogSnapshot, SnapshotId};
pub use source::{ExtractionSource, ExtractionSourceSet, FieldPriority};
