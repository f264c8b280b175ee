//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use curator_learner::LearnerConfig;
use curator_merge::MergeConfig;
use curator_standardizer::{QualityConfig, StandardizerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Row standardization
    #[serde(default)]
    pub standardizer: StandardizerConfig,

    /// Dual-source merge policy
    #[serde(default)]
    pub merge: MergeConfig,

    /// Promotion and worker settings
    #[serde(default)]
    pub learner: LearnerConfig,

    /// Completeness field sets
    #[serde(default)]
    pub quality: QualityConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Rule store database; `~/.curator/curator.db` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the default config file and database.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".curator"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default one.
    pub fn resolve_path(explicit: Option<&str>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::path(),
        }
    }

    /// Load configuration from a file, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize the whole configuration.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.standardizer
            .validate()
            .map_err(|e| CliError::Config(format!("standardizer: {}", e)))?;
        self.merge
            .validate()
            .map_err(|e| CliError::Config(format!("merge: {}", e)))?;
        self.learner
            .validate()
            .map_err(|e| CliError::Config(format!("learner: {}", e)))?;
        Ok(())
    }

    /// Database path: `--db`, then the config setting, then the default.
    pub fn database_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.settings.database {
            return Ok(path.clone());
        }
        Ok(Self::home()?.join("curator.db"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            database: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
