//! Process command implementation.

use crate::cli::ProcessArgs;
use crate::commands::{parse_records, read_input, write_json};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_domain::ProductRecord;
use curator_learner::{shutdown_signal, CurationWorker, LearnerConfig};
use curator_standardizer::{BatchReport, Standardizer};
use curator_store::SqliteRuleStore;

/// Execute the process command.
///
/// Ctrl+C stops dispatch; rows already running finish and are reported.
pub async fn execute_process(
    args: ProcessArgs,
    config: &Config,
    store: &mut SqliteRuleStore,
    formatter: &Formatter,
) -> Result<()> {
    let records = parse_records(&read_input(args.input.as_deref())?)?;
    if records.is_empty() {
        return Err(CliError::InvalidInput("No records provided".to_string()));
    }

    let learner_config = learner_config(&args, &config.learner);
    let standardizer = Standardizer::new(config.standardizer.clone())?;
    let mut worker = CurationWorker::new(standardizer, learner_config)?;

    let outcome = worker.run(records.clone(), store, shutdown_signal()).await?;

    if let Some(path) = &args.output {
        write_json(path, &apply_results(records, &outcome.report))?;
    }
    if let Some(path) = &args.flags {
        write_json(path, &outcome.flags)?;
    }

    println!("{}", formatter.format_curation(&outcome)?);
    Ok(())
}

/// Command-line overrides on top of the configured learner settings.
fn learner_config(args: &ProcessArgs, base: &LearnerConfig) -> LearnerConfig {
    let mut config = base.clone();
    if args.no_promote {
        config.auto_promote = false;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency;
    }
    config
}

/// Apply each row's diff to its record.
///
/// Results are in input order; records past a cancellation are returned
/// unchanged.
pub fn apply_results(mut records: Vec<ProductRecord>, report: &BatchReport) -> Vec<ProductRecord> {
    for (record, result) in records.iter_mut().zip(&report.results) {
        result.apply_to(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ProcessArgs {
        ProcessArgs {
            input: None,
            output: None,
            flags: None,
            no_promote: false,
            dry_run: false,
            concurrency: None,
        }
    }

    #[test]
    fn test_learner_overrides() {
        let config = learner_config(
            &ProcessArgs {
                no_promote: true,
                concurrency: Some(2),
                ..args()
            },
            &LearnerConfig::default(),
        );
        assert!(!config.auto_promote);
        assert!(!config.dry_run);
        assert_eq!(config.max_concurrency, 2);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let base = LearnerConfig::conservative();
        assert_eq!(learner_config(&args(), &base), base);
    }
}
