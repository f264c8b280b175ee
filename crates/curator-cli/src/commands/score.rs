//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::commands::{parse_records, read_input};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use curator_standardizer::QualityScorer;

/// Execute the score command.
pub async fn execute_score(args: ScoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let records = parse_records(&read_input(args.input.as_deref())?)?;
    let scorer = QualityScorer::new(config.quality.clone());

    let reports = records
        .iter()
        .map(|record| scorer.report(record, &args.collection))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    println!("{}", formatter.format_quality(&reports)?);
    Ok(())
}
