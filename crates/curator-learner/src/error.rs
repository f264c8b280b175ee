//! Error types for learning and worker operations

use curator_standardizer::StandardizerError;
use thiserror::Error;

/// Errors that can occur during learning or batch curation
#[derive(Error, Debug)]
pub enum LearnerError {
    /// Rule store error
    #[error("Storage error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Batch could not be standardized
    #[error(transparent)]
    Standardizer(#[from] StandardizerError),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
