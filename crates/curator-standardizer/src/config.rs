//! Standardizer configuration

use curator_domain::rule_table::normalize_token;
use curator_domain::Dimension;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A field whose values are normalized against a rule table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernedField {
    /// Record field name
    pub field: String,

    /// Rule domain (table name) to resolve against
    pub domain: String,
}

impl GovernedField {
    /// Govern `field` with the table for `domain`
    pub fn new(field: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            domain: domain.into(),
        }
    }
}

/// One derived boolean flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDefinition {
    /// Record field the boolean is written to
    pub field: String,

    /// Primary keyword
    pub keyword: String,

    /// Alternative spellings ("top mount", "top-mount", ...)
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl FlagDefinition {
    /// Create a flag definition
    pub fn new<I, S>(field: impl Into<String>, keyword: impl Into<String>, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            keyword: keyword.into(),
            synonyms: synonyms.into_iter().map(Into::into).collect(),
        }
    }

    /// Keyword and synonyms, normalized, blanks removed
    pub fn keywords(&self) -> Vec<String> {
        std::iter::once(&self.keyword)
            .chain(self.synonyms.iter())
            .map(|k| normalize_token(k))
            .filter(|k| !k.is_empty())
            .collect()
    }
}

/// Boolean flags derived from one categorical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationGroup {
    /// Categorical field the flags are computed from
    pub source_field: String,

    /// Flags written on every run
    pub flags: Vec<FlagDefinition>,
}

/// Record field names for the looked-up dimensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFields {
    /// Field receiving the looked-up length
    #[serde(default = "default_length_field")]
    pub length: String,

    /// Field receiving the looked-up width
    #[serde(default = "default_width_field")]
    pub width: String,

    /// Field receiving the looked-up depth
    #[serde(default = "default_depth_field")]
    pub depth: String,
}

impl DimensionFields {
    /// Record field for a dimension
    pub fn field(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Length => &self.length,
            Dimension::Width => &self.width,
            Dimension::Depth => &self.depth,
        }
    }
}

impl Default for DimensionFields {
    fn default() -> Self {
        Self {
            length: default_length_field(),
            width: default_width_field(),
            depth: default_depth_field(),
        }
    }
}

fn default_length_field() -> String {
    "length".to_string()
}

fn default_width_field() -> String {
    "width".to_string()
}

fn default_depth_field() -> String {
    "depth".to_string()
}

/// Capacity derived from the three dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Field receiving the computed volume
    pub field: String,

    /// length × width × depth is divided by this (1e6 turns mm³ into litres)
    #[serde(default = "default_volume_divisor")]
    pub divisor: f64,

    /// Decimal places kept after rounding, at most [`MAX_VOLUME_DECIMALS`]
    #[serde(default = "default_volume_decimals")]
    pub decimals: u32,
}

/// Upper bound for [`VolumeConfig::decimals`]
pub const MAX_VOLUME_DECIMALS: u32 = 10;

fn default_volume_divisor() -> f64 {
    1_000_000.0
}

fn default_volume_decimals() -> u32 {
    1
}

/// Configuration for row standardization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizerConfig {
    /// Field holding the product title (required; also the fallback match text)
    #[serde(default = "default_title_field")]
    pub title_field: String,

    /// Fields normalized against rule tables, in resolution order
    #[serde(default)]
    pub governed_fields: Vec<GovernedField>,

    /// Boolean flags derived from categorical fields
    #[serde(default)]
    pub derivations: Vec<DerivationGroup>,

    /// Where looked-up dimensions are written
    #[serde(default)]
    pub dimension_fields: DimensionFields,

    /// Optional derived capacity
    #[serde(default)]
    pub volume: Option<VolumeConfig>,
}

fn default_title_field() -> String {
    "title".to_string()
}

impl Default for StandardizerConfig {
    /// Sink catalog: installation, material, grade, style, location, drain
    /// and warranty governed; mount-type flags derived from installation;
    /// bowl volume in litres from millimetre dimensions.
    fn default() -> Self {
        Self {
            title_field: default_title_field(),
            governed_fields: vec![
                GovernedField::new("installation", "installation"),
                GovernedField::new("material", "material"),
                GovernedField::new("grade", "grade"),
                GovernedField::new("style", "style"),
                GovernedField::new("location", "location"),
                GovernedField::new("drain_position", "drain"),
                GovernedField::new("warranty", "warranty"),
            ],
            derivations: vec![DerivationGroup {
                source_field: "installation".to_string(),
                flags: vec![
                    FlagDefinition::new("is_undermount", "UNDERMOUNT", ["UNDER MOUNT", "UNDER-MOUNT"]),
                    FlagDefinition::new(
                        "is_topmount",
                        "TOPMOUNT",
                        ["TOP MOUNT", "TOP-MOUNT", "SURFACE MOUNT", "DROP IN", "DROP-IN"],
                    ),
                    FlagDefinition::new("is_flushmount", "FLUSHMOUNT", ["FLUSH MOUNT", "FLUSH-MOUNT"]),
                ],
            }],
            dimension_fields: DimensionFields::default(),
            volume: Some(VolumeConfig {
                field: "bowl_volume_litres".to_string(),
                divisor: default_volume_divisor(),
                decimals: default_volume_decimals(),
            }),
        }
    }
}

impl StandardizerConfig {
    /// Configuration with nothing governed or derived (title check and
    /// dimension override only)
    pub fn minimal() -> Self {
        Self {
            title_field: default_title_field(),
            governed_fields: Vec::new(),
            derivations: Vec::new(),
            dimension_fields: DimensionFields::default(),
            volume: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.title_field.trim().is_empty() {
            return Err("title_field must not be empty".to_string());
        }

        let mut governed = HashSet::new();
        for g in &self.governed_fields {
            if g.field.trim().is_empty() || g.domain.trim().is_empty() {
                return Err("governed fields need both a field and a domain".to_string());
            }
            if !governed.insert(g.field.as_str()) {
                return Err(format!("field '{}' is governed more than once", g.field));
            }
        }

        let mut derived = HashSet::new();
        for group in &self.derivations {
            if group.source_field.trim().is_empty() {
                return Err("derivation source_field must not be empty".to_string());
            }
            for flag in &group.flags {
                if flag.keywords().is_empty() {
                    return Err(format!("flag '{}' has no keywords", flag.field));
                }
                if governed.contains(flag.field.as_str()) {
                    return Err(format!("flag '{}' is also a governed field", flag.field));
                }
                if !derived.insert(flag.field.as_str()) {
                    return Err(format!("flag '{}' is derived more than once", flag.field));
                }
            }
        }

        if let Some(volume) = &self.volume {
            if volume.field.trim().is_empty() {
                return Err("volume.field must not be empty".to_string());
            }
            if !(volume.divisor > 0.0) {
                return Err("volume.divisor must be greater than 0".to_string());
            }
            if volume.decimals > MAX_VOLUME_DECIMALS {
                return Err(format!("volume.decimals must be at most {}", MAX_VOLUME_DECIMALS));
            }
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

/// Completeness field sets per collection type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Collection name → fields counted toward completeness
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<String>>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(
            "sinks".to_string(),
            [
                "title",
                "installation",
                "material",
                "length",
                "width",
                "depth",
                "is_undermount",
                "is_topmount",
                "is_flushmount",
                "bowl_volume_litres",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
        );
        Self { collections }
    }
}
