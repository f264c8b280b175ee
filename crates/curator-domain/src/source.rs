//! Extraction sources and per-field merge priority

use crate::FieldMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin of a provisional field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionSource {
    /// Vision/text extraction from a spec-sheet document
    #[default]
    Document,

    /// Scraped supplier page
    Page,
}

impl ExtractionSource {
    /// The other source
    pub fn other(&self) -> Self {
        match self {
            ExtractionSource::Document => ExtractionSource::Page,
            ExtractionSource::Page => ExtractionSource::Document,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionSource::Document => "document",
            ExtractionSource::Page => "page",
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field is reconciled when both sources may produce it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldPriority {
    /// Prefer the document value, fall back to the page
    DocumentFirst,

    /// Prefer the page value, fall back to the document
    PageFirst,

    /// Whichever is non-empty; the tiebreak source wins when both are
    FirstNonEmpty,
}

impl FieldPriority {
    /// Sources in the order they are consulted
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::{ExtractionSource, FieldPriority};
    ///
    /// assert_eq!(
    ///     FieldPriority::FirstNonEmpty.order(ExtractionSource::Page),
    ///     [ExtractionSource::Page, ExtractionSource::Document],
    /// );
    /// ```
    pub fn order(&self, tiebreak: ExtractionSource) -> [ExtractionSource; 2] {
        match self {
            FieldPriority::DocumentFirst => [ExtractionSource::Document, ExtractionSource::Page],
            FieldPriority::PageFirst => [ExtractionSource::Page, ExtractionSource::Document],
            FieldPriority::FirstNonEmpty => [tiebreak, tiebreak.other()],
        }
    }
}

/// Provisional field sets for one record, one per source
///
/// Transient: exists only while a record is being assembled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionSourceSet {
    /// Key of the record being assembled
    pub key: String,

    /// Fields produced from the spec-sheet document
    #[serde(default)]
    pub document: FieldMap,

    /// Fields produced from the supplier page
    #[serde(default)]
    pub page: FieldMap,
}

impl ExtractionSourceSet {
    /// Field map for one source
    pub fn source(&self, source: ExtractionSource) -> &FieldMap {
        match source {
            ExtractionSource::Document => &self.document,
            ExtractionSource::Page => &self.page,
        }
    }
}
