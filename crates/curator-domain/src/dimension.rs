//! Dimension lookup - authoritative length/width/depth by record key

use crate::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the three looked-up dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Overall length
    Length,

    /// Overall width
    Width,

    /// Overall depth
    Depth,
}

impl Dimension {
    /// All dimensions in override order
    pub const ALL: [Dimension; 3] = [Dimension::Length, Dimension::Width, Dimension::Depth];

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Width => "width",
            Dimension::Depth => "depth",
        }
    }
}

/// Looked-up values for one key
///
/// Values are kept as imported. Anything that does not parse as a number is
/// skipped at override time rather than rejected at load time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionEntry {
    /// Length, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<FieldValue>,

    /// Width, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<FieldValue>,

    /// Depth, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<FieldValue>,
}

impl DimensionEntry {
    /// Entry with all three numeric values
    pub fn numeric(length: f64, width: f64, depth: f64) -> Self {
        Self {
            length: Some(FieldValue::Number(length)),
            width: Some(FieldValue::Number(width)),
            depth: Some(FieldValue::Number(depth)),
        }
    }

    /// Raw value for one dimension
    pub fn get(&self, dimension: Dimension) -> Option<&FieldValue> {
        match dimension {
            Dimension::Length => self.length.as_ref(),
            Dimension::Width => self.width.as_ref(),
            Dimension::Depth => self.depth.as_ref(),
        }
        .filter(|v| !v.is_blank())
    }

    /// Set one dimension
    pub fn set(&mut self, dimension: Dimension, value: FieldValue) {
        let slot = match dimension {
            Dimension::Length => &mut self.length,
            Dimension::Width => &mut self.width,
            Dimension::Depth => &mut self.depth,
        };
        *slot = Some(value);
    }
}

/// Reference table keyed by record key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionLookup {
    entries: BTreeMap<String, DimensionEntry>,
}

impl DimensionLookup {
    /// Create an empty lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the entry for a key
    pub fn insert(&mut self, key: impl Into<String>, entry: DimensionEntry) {
        self.entries.insert(key.into().trim().to_string(), entry);
    }

    /// Builder-style insert
    pub fn with_entry(mut self, key: impl Into<String>, entry: DimensionEntry) -> Self {
        self.insert(key, entry);
        self
    }

    /// Entry for a key, if any
    pub fn get(&self, key: &str) -> Option<&DimensionEntry> {
        self.entries.get(key.trim())
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DimensionEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the lookup is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
