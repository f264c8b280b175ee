//! Dimension override and volume computation
//!
//! The lookup is authoritative: when it has an entry for the record key,
//! its values replace whatever the record holds, including values written
//! by rules or by hand.

use crate::config::{DimensionFields, VolumeConfig, MAX_VOLUME_DECIMALS};
use crate::diff::{FieldUpdate, UpdateKind};
use curator_domain::{Dimension, DimensionLookup, FieldValue, ProductRecord};
use tracing::{debug, warn};

/// Applies looked-up dimensions to a record
#[derive(Debug, Clone, Copy)]
pub struct DimensionOverride<'a> {
    lookup: &'a DimensionLookup,
    fields: &'a DimensionFields,
}

impl<'a> DimensionOverride<'a> {
    /// Create an override over a lookup table
    pub fn new(lookup: &'a DimensionLookup, fields: &'a DimensionFields) -> Self {
        Self { lookup, fields }
    }

    /// Override the record's dimensions in place
    ///
    /// Returns one update per field whose value actually changed. A key with
    /// no entry is a no-op and never clears existing dimensions. Looked-up
    /// values that are not numbers are skipped with a warning.
    pub fn apply(&self, record: &mut ProductRecord, warnings: &mut Vec<String>) -> Vec<FieldUpdate> {
        let Some(entry) = self.lookup.get(&record.key) else {
            debug!(key = %record.key, "No dimension entry");
            return Vec::new();
        };

        let mut updates = Vec::new();
        for dimension in Dimension::ALL {
            let Some(raw) = entry.get(dimension) else {
                continue;
            };
            let field = self.fields.field(dimension);

            let Some(number) = raw.as_number() else {
                let message = format!(
                    "lookup {} for '{}' is not a number: '{}'",
                    dimension.as_str(),
                    record.key,
                    raw
                );
                warn!(key = %record.key, dimension = dimension.as_str(), value = %raw, "Malformed dimension value skipped");
                warnings.push(message);
                continue;
            };

            let value = FieldValue::Number(number);
            if record.get(field) != Some(&value) {
                record.set(field, value.clone());
                updates.push(FieldUpdate::new(field, value, UpdateKind::Dimension));
            }
        }
        updates
    }
}

/// Compute `length × width × depth / divisor`, rounded
///
/// Returns `Ok(None)` when any dimension is missing and `Err` with a
/// warning message when any dimension is present but not a number.
pub fn compute_volume(
    record: &ProductRecord,
    fields: &DimensionFields,
    config: &VolumeConfig,
) -> Result<Option<f64>, String> {
    let mut product = 1.0;
    for dimension in Dimension::ALL {
        let field = fields.field(dimension);
        let value = record.value(field);
        if value.is_blank() {
            return Ok(None);
        }
        match value.as_number() {
            Some(n) => product *= n,
            None => {
                return Err(format!(
                    "cannot compute {}: {} '{}' is not a number",
                    config.field, field, value
                ))
            }
        }
    }

    let scale = 10f64.powi(config.decimals.min(MAX_VOLUME_DECIMALS) as i32);
    Ok(Some((product / config.divisor * scale).round() / scale))
}

/// Write the computed volume to the record when it changed
pub fn apply_volume(
    record: &mut ProductRecord,
    fields: &DimensionFields,
    config: &VolumeConfig,
    warnings: &mut Vec<String>,
) -> Option<FieldUpdate> {
    match compute_volume(record, fields, config) {
        Ok(Some(volume)) => {
            let value = FieldValue::Number(volume);
            if record.get(&config.field) == Some(&value) {
                return None;
            }
            record.set(config.field.clone(), value.clone());
            Some(FieldUpdate::new(config.field.clone(), value, UpdateKind::Computed))
        }
        Ok(None) => None,
        Err(message) => {
            warn!(key = %record.key, field = %config.field, "{}", message);
            warnings.push(message);
            None
        }
    }
}
