//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rule store error
    #[error("Store error: {0}")]
    Store(#[from] curator_store::StoreError),

    /// Standardization error
    #[error("Standardizer error: {0}")]
    Standardizer(#[from] curator_standardizer::StandardizerError),

    /// Merge error
    #[error("Merge error: {0}")]
    Merge(#[from] curator_merge::MergeError),

    /// Learner error
    #[error("Learner error: {0}")]
    Learner(#[from] curator_learner::LearnerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
