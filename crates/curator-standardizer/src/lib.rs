//! Curator Standardizer
//!
//! Rule-based standardization of product records.
//!
//! The standardizer provides:
//! - Rule matching with compound values and title fallback
//! - Authoritative dimension override and derived volume
//! - Boolean flag derivation from categorical fields
//! - Row processing with unmatched-value flags
//! - Completeness scoring
//!
//! # Examples
//!
//! ```
//! use curator_domain::{CatalogSnapshot, DimensionLookup, ProductRecord, RuleBook, RuleTable};
//! use curator_standardizer::{Standardizer, StandardizerConfig};
//!
//! let rules = RuleBook::new().with_table(RuleTable::from_pairs(
//!     "installation",
//!     [("UNDER", "Undermount")],
//! ));
//! let snapshot = CatalogSnapshot::new(rules, DimensionLookup::new());
//!
//! let standardizer = Standardizer::new(StandardizerConfig::default()).unwrap();
//! let record = ProductRecord::new("SKU-1")
//!     .with_field("title", "Kitchen sink")
//!     .with_field("installation", "under-mount");
//!
//! let result = standardizer.process(&record, &snapshot);
//! assert_eq!(result.updated_count(), 1);
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod derivation;
mod diff;
mod dimensions;
mod error;
mod matcher;
mod processor;
mod quality;

pub use batch::{BatchCounters, BatchReport, Standardizer};
pub use config::{
    DerivationGroup, DimensionFields, FlagDefinition, GovernedField, QualityConfig, StandardizerConfig,
    VolumeConfig, MAX_VOLUME_DECIMALS,
};
pub use derivation::{split_components, BooleanDerivationEngine, COMPONENT_SEPARATORS};
pub use diff::{FieldUpdate, UpdateKind};
pub use dimensions::{apply_volume, compute_volume, DimensionOverride};
pub use error::StandardizerError;
pub use matcher::{is_compound, split_compound, RuleMatcher, COMPOUND_DELIMITERS, COMPOUND_JOINER};
pub use processor::{ProcessingStage, RowProcessor, RowResult, SkipReason};
pub use quality::{QualityFieldSet, QualityReport, QualityScorer};
