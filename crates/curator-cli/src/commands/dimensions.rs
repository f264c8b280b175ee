//! Dimensions command implementation.

use crate::cli::{DimensionsAction, DimensionsArgs};
use crate::error::Result;
use crate::output::Formatter;
use curator_store::import::{parse_dimensions, DocumentFormat};
use curator_store::SqliteRuleStore;
use std::fs;
use std::path::Path;

/// Execute the dimensions command.
pub async fn execute_dimensions(
    args: DimensionsArgs,
    store: &mut SqliteRuleStore,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        DimensionsAction::Import { file } => {
            let contents = fs::read_to_string(&file)?;
            let lookup = parse_dimensions(&contents, DocumentFormat::from_path(Path::new(&file)))?;
            let count = store.import_dimensions(&lookup)?;

            println!(
                "{}",
                formatter.success(&format!(
                    "Imported {} dimension row(s); {} stored",
                    count,
                    store.dimension_count()?
                ))
            );
            Ok(())
        }
    }
}
