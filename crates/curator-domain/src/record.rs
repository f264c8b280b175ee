//! Product record - one catalog entry as a field map

use crate::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name → value map
///
/// Ordered so diffs, exports and test output are stable.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A single product in the catalog
///
/// `key` joins the record against the dimension lookup and must stay stable
/// across re-processing. Field names are collection-specific.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Stable join key (SKU, supplier code, ...)
    pub key: String,

    /// Attribute values by field name
    #[serde(default)]
    pub fields: FieldMap,
}

impl ProductRecord {
    /// Create an empty record with the given key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: FieldMap::new(),
        }
    }

    /// Builder-style field setter
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::{FieldValue, ProductRecord};
    ///
    /// let record = ProductRecord::new("SKU-1")
    ///     .with_field("title", "Undermount kitchen sink")
    ///     .with_field("width", 450.0);
    /// assert_eq!(record.get("width"), Some(&FieldValue::Number(450.0)));
    /// ```
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a field value, if the field exists
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a field value, treating an absent field as `Empty`
    pub fn value(&self, name: &str) -> FieldValue {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// True when the field is absent or blank
    pub fn is_blank(&self, name: &str) -> bool {
        self.fields.get(name).map_or(true, FieldValue::is_blank)
    }

    /// Set a field value, returning the previous one
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }
}
