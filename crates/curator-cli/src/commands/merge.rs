//! Merge command implementation.

use crate::cli::MergeArgs;
use crate::commands::{read_input, write_json};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_domain::ProductRecord;
use curator_merge::{parse_source_sets, DualSourceMerger};

/// Execute the merge command.
pub async fn execute_merge(args: MergeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let sets = parse_source_sets(&read_input(args.input.as_deref())?)?;
    if sets.is_empty() {
        return Err(CliError::InvalidInput("No source sets provided".to_string()));
    }

    let merger = DualSourceMerger::new(config.merge.clone())?;
    let outcomes = merger.merge_all(&sets);

    if let Some(path) = &args.output {
        let records: Vec<&ProductRecord> = outcomes.iter().map(|o| &o.record).collect();
        write_json(path, &records)?;
    }

    println!("{}", formatter.format_merges(&outcomes)?);
    Ok(())
}
