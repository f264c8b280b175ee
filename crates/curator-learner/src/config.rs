//! Configuration for rule learning and the curation worker

use serde::{Deserialize, Serialize};

/// Configuration for the learner
///
/// # Examples
///
/// ```
/// use curator_learner::LearnerConfig;
///
/// // Default: promote after each batch, 4 rows in flight
/// let config = LearnerConfig::default();
/// assert!(config.auto_promote);
/// assert_eq!(config.max_concurrency, 4);
///
/// // Conservative: report only, one row at a time
/// let config = LearnerConfig::conservative();
/// assert!(config.dry_run);
/// assert_eq!(config.max_concurrency, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerConfig {
    /// Report what would be appended without touching any table
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Promote collected flags once a worker batch finishes
    /// Default: true
    #[serde(default = "default_auto_promote")]
    pub auto_promote: bool,

    /// Rows processed concurrently by the worker
    /// Default: 4
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_auto_promote() -> bool {
    true
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            auto_promote: default_auto_promote(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl LearnerConfig {
    /// Conservative configuration: dry run, sequential, no auto-promotion
    ///
    /// Suitable for a first pass over an unfamiliar catalog.
    pub fn conservative() -> Self {
        Self {
            dry_run: true,
            auto_promote: false,
            max_concurrency: 1,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(LearnerConfig::default().validate().is_ok());
        assert!(LearnerConfig::conservative().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency() {
        let config = LearnerConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = LearnerConfig::from_toml("dry_run = true").unwrap();
        assert!(config.dry_run);
        assert!(config.auto_promote);
        assert_eq!(config.max_concurrency, 4);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LearnerConfig::conservative();
        let parsed = LearnerConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }
}
