//! Error types for the merger

use thiserror::Error;

/// Errors that can occur while merging extraction sources
#[derive(Error, Debug)]
pub enum MergeError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source set input could not be parsed
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// A source set without a record key
    #[error("Source set {0} has no record key")]
    MissingKey(usize),
}

impl From<serde_json::Error> for MergeError {
    fn from(e: serde_json::Error) -> Self {
        MergeError::JsonParse(e.to_string())
    }
}
