//! Command implementations.

pub mod config;
pub mod dimensions;
pub mod learn;
pub mod merge;
pub mod process;
pub mod rules;
pub mod score;

pub use self::config::execute_config;
pub use self::dimensions::execute_dimensions;
pub use self::learn::execute_learn;
pub use self::merge::execute_merge;
pub use self::process::execute_process;
pub use self::rules::execute_rules;
pub use self::score::execute_score;

use crate::error::{CliError, Result};
use curator_domain::ProductRecord;
use serde::Serialize;
use std::fs;
use std::io::{self, Read};

/// Read a file, or stdin when no path (or `-`) is given.
pub fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Parse records from JSON: either one object or an array of objects.
///
/// Every record must carry a non-blank `key`.
pub fn parse_records(json: &str) -> Result<Vec<ProductRecord>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let records: Vec<ProductRecord> = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };

    if let Some(index) = records.iter().position(|r| r.key.trim().is_empty()) {
        return Err(CliError::InvalidInput(format!("record {} has no key", index)));
    }
    Ok(records)
}

/// Write a value as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &str, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    tracing::info!("Wrote {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::FieldValue;

    #[test]
    fn test_parse_single_record() {
        let records = parse_records(r#"{"key": "SKU-1", "fields": {"title": "Sink", "width": 450}}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("width"), Some(&FieldValue::Number(450.0)));
    }

    #[test]
    fn test_parse_record_array() {
        let records = parse_records(r#"[{"key": "SKU-1"}, {"key": "SKU-2", "fields": {"material": null}}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("material"), Some(&FieldValue::Empty));
    }

    #[test]
    fn test_record_without_key_rejected() {
        let result = parse_records(r#"[{"key": "SKU-1"}, {"key": " "}]"#);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(parse_records("not json").is_err());
    }
}
