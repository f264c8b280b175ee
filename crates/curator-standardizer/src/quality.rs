//! Completeness scoring

use crate::config::QualityConfig;
use crate::StandardizerError;
use curator_domain::ProductRecord;
use serde::Serialize;

/// Ordered, duplicate-free set of fields counted toward completeness
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualityFieldSet {
    fields: Vec<String>,
}

impl QualityFieldSet {
    /// Build a set, keeping the first occurrence of each field name
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !field.trim().is_empty() && !set.contains(&field) {
                set.push(field);
            }
        }
        Self { fields: set }
    }

    /// Field names in configured order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the set is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Score plus the fields behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    /// Record key
    pub key: String,

    /// Completeness, 0..=100
    pub score: u8,

    /// Fields with a value
    pub present: Vec<String>,

    /// Fields absent or blank
    pub missing: Vec<String>,
}

/// Computes completeness over configured field sets
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    config: QualityConfig,
}

impl QualityScorer {
    /// Create a scorer over per-collection field sets
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Field set for a collection
    pub fn field_set(&self, collection: &str) -> Result<QualityFieldSet, StandardizerError> {
        self.config
            .collections
            .get(collection)
            .map(|fields| QualityFieldSet::new(fields.iter().cloned()))
            .ok_or_else(|| StandardizerError::UnknownCollection(collection.to_string()))
    }

    /// `round(100 × present / |set|)`; an empty set scores 0
    ///
    /// `false` and `0` count as present.
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::ProductRecord;
    /// use curator_standardizer::{QualityFieldSet, QualityScorer};
    ///
    /// let set = QualityFieldSet::new(["title", "is_topmount", "width", "material"]);
    /// let record = ProductRecord::new("SKU-1")
    ///     .with_field("title", "Sink")
    ///     .with_field("is_topmount", false)
    ///     .with_field("width", 0.0);
    ///
    /// assert_eq!(QualityScorer::score(&record, &set), 75);
    /// ```
    pub fn score(record: &ProductRecord, set: &QualityFieldSet) -> u8 {
        if set.is_empty() {
            return 0;
        }
        let present = set.fields().iter().filter(|f| !record.is_blank(f)).count();
        ((100.0 * present as f64) / set.len() as f64).round() as u8
    }

    /// Score a record against a named collection
    pub fn score_collection(&self, record: &ProductRecord, collection: &str) -> Result<u8, StandardizerError> {
        Ok(Self::score(record, &self.field_set(collection)?))
    }

    /// Score plus present/missing breakdown
    pub fn report(&self, record: &ProductRecord, collection: &str) -> Result<QualityReport, StandardizerError> {
        let set = self.field_set(collection)?;
        let (present, missing): (Vec<String>, Vec<String>) =
            set.fields().iter().cloned().partition(|f| !record.is_blank(f));
        Ok(QualityReport {
            key: record.key.clone(),
            score: Self::score(record, &set),
            present,
            missing,
        })
    }
}
