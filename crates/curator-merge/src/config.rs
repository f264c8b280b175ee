//! Configuration for the merger

use curator_domain::{ExtractionSource, FieldPriority};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Per-field merge policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Policy for fields with no override and not dimension-like
    #[serde(default = "default_priority")]
    pub default_priority: FieldPriority,

    /// Source that wins `first-non-empty` when both have a value
    #[serde(default)]
    pub tiebreak: ExtractionSource,

    /// Dimension-like fields; `document-first` unless overridden
    #[serde(default = "default_dimension_fields")]
    pub dimension_fields: Vec<String>,

    /// Explicit per-field policies
    #[serde(default)]
    pub fields: BTreeMap<String, FieldPriority>,
}

fn default_priority() -> FieldPriority {
    FieldPriority::FirstNonEmpty
}

fn default_dimension_fields() -> Vec<String> {
    ["length", "width", "depth", "height"]
        .iter()
        .map(|f| f.to_string())
        .collect()
}

impl Default for MergeConfig {
    /// `first-non-empty` with document tiebreak; dimensions document-first
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            tiebreak: ExtractionSource::Document,
            dimension_fields: default_dimension_fields(),
            fields: BTreeMap::new(),
        }
    }
}

impl MergeConfig {
    /// Document preset: every field prefers the spec sheet
    pub fn document_preferred() -> Self {
        Self {
            default_priority: FieldPriority::DocumentFirst,
            ..Self::default()
        }
    }

    /// Page preset: supplier page wins everything except dimensions
    pub fn page_preferred() -> Self {
        Self {
            default_priority: FieldPriority::PageFirst,
            tiebreak: ExtractionSource::Page,
            ..Self::default()
        }
    }

    /// Builder-style per-field override
    pub fn with_field(mut self, field: impl Into<String>, priority: FieldPriority) -> Self {
        self.fields.insert(field.into(), priority);
        self
    }

    /// Policy for a field: override, then dimension default, then global default
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::FieldPriority;
    /// use curator_merge::MergeConfig;
    ///
    /// let config = MergeConfig::default().with_field("material", FieldPriority::PageFirst);
    /// assert_eq!(config.priority_for("width"), FieldPriority::DocumentFirst);
    /// assert_eq!(config.priority_for("material"), FieldPriority::PageFirst);
    /// assert_eq!(config.priority_for("title"), FieldPriority::FirstNonEmpty);
    /// ```
    pub fn priority_for(&self, field: &str) -> FieldPriority {
        if let Some(priority) = self.fields.get(field) {
            return *priority;
        }
        if self.dimension_fields.iter().any(|d| d == field) {
            return FieldPriority::DocumentFirst;
        }
        self.default_priority
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for field in &self.dimension_fields {
            if field.trim().is_empty() {
                return Err("dimension_fields must not contain empty names".to_string());
            }
            if !seen.insert(field.as_str()) {
                return Err(format!("dimension field '{}' listed more than once", field));
            }
        }
        if self.fields.keys().any(|f| f.trim().is_empty()) {
            return Err("field overrides must not use empty names".to_string());
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
