//! Field values - the scalar cells of a product record

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A single scalar attribute value
///
/// Serialized untagged so JSON `null`, booleans, numbers and strings map
/// directly onto the variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean value (derived flags, yes/no attributes)
    Bool(bool),

    /// Numeric value (dimensions, capacities)
    Number(f64),

    /// Free text
    Text(String),

    /// No value
    #[default]
    Empty,
}

impl FieldValue {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// True when the value carries no information
    ///
    /// `Empty` and whitespace-only text are blank. `false` and `0` are
    /// meaningful values and are *not* blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::FieldValue;
    ///
    /// assert!(FieldValue::Empty.is_blank());
    /// assert!(FieldValue::text("   ").is_blank());
    /// assert!(!FieldValue::Bool(false).is_blank());
    /// assert!(!FieldValue::Number(0.0).is_blank());
    /// ```
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }

    /// String representation used for matching and display
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Empty => Cow::Borrowed(""),
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
            FieldValue::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    /// Interpret the value as a number
    ///
    /// Text is parsed after trimming. Returns `None` for blank values,
    /// booleans, and text that is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Interpret the value as a boolean, if it is one
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Render whole numbers without a trailing `.0`
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}
