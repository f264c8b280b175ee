//! Standardizer error types

use thiserror::Error;

/// Errors that can occur during standardization
///
/// Per-record conditions (missing title, unmatched values, missing lookup
/// keys, malformed numbers) are reported on the row result instead; only
/// failures that would invalidate a whole batch surface here.
#[derive(Error, Debug)]
pub enum StandardizerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No rule table could be loaded at all
    #[error("No rule tables loaded; refusing to evaluate {0} governed field(s) as unmatched")]
    NoRuleTables(usize),

    /// Quality scoring requested for a collection with no field set
    #[error("Unknown quality collection: {0}")]
    UnknownCollection(String),

    /// Rule store error while reloading a snapshot
    #[error("Store error: {0}")]
    Store(String),
}
