//! Import and export documents
//!
//! Rule book (TOML):
//!
//! ```toml
//! [[tables]]
//! domain = "installation"
//! rules = [
//!     ["UNDERMOUNT", "Undermount"],
//!     ["FLUSHMOUNT", ""],          # blank standard value deletes
//! ]
//! ```
//!
//! Dimensions (TOML `[[dimensions]]` rows, or a JSON array of the same rows):
//!
//! ```toml
//! [[dimensions]]
//! key = "SKU-100"
//! length = 860
//! width = 450
//! depth = "200"
//! ```

use crate::StoreError;
use curator_domain::{DimensionEntry, DimensionLookup, FieldValue, RuleBook, RuleEntry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rule table in an import document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    /// Domain name
    pub domain: String,

    /// `[search token, standard value]` pairs in scan order
    #[serde(default)]
    pub rules: Vec<(String, String)>,
}

/// A rule book import document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleBookDocument {
    /// Tables in the document
    #[serde(default)]
    pub tables: Vec<TableDocument>,
}

/// One dimension row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRow {
    /// Record key
    pub key: String,

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

#[derive(Debug, Deserialize)]
struct DimensionDocument {
    #[serde(default)]
    dimensions: Vec<DimensionRow>,
}

/// Document format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.toml`
    Toml,

    /// `.json`
    Json,
}

impl DocumentFormat {
    /// Format for a path; anything that is not `.json` is read as TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

/// Parse a TOML rule book
///
/// Repeated domains are concatenated in document order. Blank and duplicate
/// tokens are dropped (first occurrence wins).
pub fn parse_rule_book(toml_str: &str) -> Result<RuleBook, StoreError> {
    let document: RuleBookDocument =
        toml::from_str(toml_str).map_err(|e| StoreError::Import(format!("Failed to parse TOML: {}", e)))?;

    let mut book = RuleBook::new();
    for table in document.tables {
        if table.domain.trim().is_empty() {
            return Err(StoreError::Import("table without a domain".to_string()));
        }
        let target = book.table_mut_or_create(&table.domain);
        for (token, standard) in table.rules {
            target.push(RuleEntry::new(&token, standard));
        }
    }
    Ok(book)
}

/// Serialize a rule book to the TOML import format
pub fn export_rule_book(book: &RuleBook) -> Result<String, StoreError> {
    let document = RuleBookDocument {
        tables: book
            .tables()
            .map(|t| TableDocument {
                domain: t.domain().to_string(),
                rules: t
                    .entries()
                    .iter()
                    .map(|e| (e.search_token.clone(), e.standard_value.clone()))
                    .collect(),
            })
            .collect(),
    };
    toml::to_string_pretty(&document).map_err(|e| StoreError::Import(format!("Failed to serialize to TOML: {}", e)))
}

/// Parse dimension rows in the given format
pub fn parse_dimensions(input: &str, format: DocumentFormat) -> Result<DimensionLookup, StoreError> {
    let rows: Vec<DimensionRow> = match format {
        DocumentFormat::Toml => {
            let document: DimensionDocument = toml::from_str(input)
                .map_err(|e| StoreError::Import(format!("Failed to parse TOML: {}", e)))?;
            document.dimensions
        }
        DocumentFormat::Json => serde_json::from_str(input)
            .map_err(|e| StoreError::Import(format!("Failed to parse JSON: {}", e)))?,
    };

    let mut lookup = DimensionLookup::new();
    for (index, row) in rows.into_iter().enumerate() {
        if row.key.trim().is_empty() {
            return Err(StoreError::Import(format!("dimension row {} has no key", index)));
        }
        lookup.insert(
            row.key,
            DimensionEntry {
                length: row.length,
                width: row.width,
                depth: row.depth,
            },
        );
    }
    Ok(lookup)
}
