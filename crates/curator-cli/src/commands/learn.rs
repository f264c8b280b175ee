//! Learn command implementation.

use crate::cli::LearnArgs;
use crate::commands::{read_input, write_json};
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_domain::UnmatchedValueFlag;
use curator_learner::RuleLearner;
use curator_store::SqliteRuleStore;

/// Execute the learn command.
pub async fn execute_learn(
    args: LearnArgs,
    config: &Config,
    store: &mut SqliteRuleStore,
    formatter: &Formatter,
) -> Result<()> {
    let mut flags: Vec<UnmatchedValueFlag> = serde_json::from_str(&read_input(args.input.as_deref())?)?;
    if flags.is_empty() {
        return Err(CliError::InvalidInput("No flags provided".to_string()));
    }

    let mut learner_config = config.learner.clone();
    if args.dry_run {
        learner_config.dry_run = true;
    }
    let mut learner = RuleLearner::new(learner_config);
    let report = learner.promote_into_store(&mut flags, store)?;

    if let Some(path) = &args.output {
        write_json(path, &flags)?;
    }

    println!("{}", formatter.format_promotion(&report, &flags)?);
    if formatter.format() == OutputFormat::Table {
        println!("{}", learner.metrics().summary());
    }
    if learner.config().dry_run {
        println!("{}", formatter.info("Dry run: no rule tables were changed"));
    }
    Ok(())
}
