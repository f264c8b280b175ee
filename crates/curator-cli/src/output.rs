//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use curator_domain::{RuleTable, UnmatchedValueFlag};
use curator_learner::{CurationOutcome, PromotionReport};
use curator_merge::MergeOutcome;
use curator_standardizer::{BatchReport, QualityReport};
use curator_store::TableStats;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a batch run with its promotion.
    pub fn format_curation(&self, outcome: &CurationOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Quiet => Ok(outcome
                .report
                .results
                .iter()
                .filter(|r| !r.is_skipped())
                .map(|r| r.key.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut out = self.format_batch_table(&outcome.report);
                if !outcome.flags.is_empty() {
                    out.push('\n');
                    out.push_str(&self.format_flags_table(&outcome.flags));
                }
                out.push('\n');
                out.push_str(&self.batch_summary(&outcome.report));
                if let Some(promotion) = &outcome.promotion {
                    out.push('\n');
                    out.push_str(&self.promotion_summary(promotion));
                }
                Ok(out)
            }
        }
    }

    /// Per-record results as a table.
    fn format_batch_table(&self, report: &BatchReport) -> String {
        if report.results.is_empty() {
            return self.colorize("No records processed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Key", "Updated", "Cleared", "Flags", "Status"]);

        for result in &report.results {
            let status = match &result.skip_reason {
                Some(reason) => format!("skipped: {}", reason),
                None if !result.warnings.is_empty() => result.warnings.join("; "),
                None => "ok".to_string(),
            };
            builder.push_record([
                result.key.clone(),
                result.updated_count().to_string(),
                result.cleared_count().to_string(),
                result.flags.len().to_string(),
                status,
            ]);
        }

        self.styled(builder)
    }

    /// Batch counters as a status line.
    fn batch_summary(&self, report: &BatchReport) -> String {
        let line = format!(
            "{} processed, {} skipped, {} updated, {} cleared, {} flagged (snapshot {})",
            report.counters.processed,
            report.counters.skipped,
            report.counters.updated,
            report.counters.cleared,
            report.counters.flagged,
            report.snapshot_id
        );
        if report.cancelled {
            self.warning(&format!("Cancelled: {}", line))
        } else {
            self.success(&line)
        }
    }

    /// Format flags.
    pub fn format_flags(&self, flags: &[UnmatchedValueFlag]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(flags)?),
            OutputFormat::Quiet => Ok(flags
                .iter()
                .map(|f| f.raw_value.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.format_flags_table(flags)),
        }
    }

    fn format_flags_table(&self, flags: &[UnmatchedValueFlag]) -> String {
        if flags.is_empty() {
            return self.colorize("No flags.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Key", "Field", "Value", "Domain", "Reason", "Status"]);
        for flag in flags {
            builder.push_record([
                flag.record_key.clone(),
                flag.field.clone(),
                flag.raw_value.clone(),
                flag.rule_domain.clone(),
                flag.reason.as_str().to_string(),
                format!("{:?}", flag.status),
            ]);
        }
        self.styled(builder)
    }

    /// Format a promotion run.
    pub fn format_promotion(&self, report: &PromotionReport, flags: &[UnmatchedValueFlag]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "promotion": report,
                "flags": flags,
            }))?),
            OutputFormat::Quiet => Ok(report.promoted.to_string()),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.format_flags_table(flags),
                self.promotion_summary(report)
            )),
        }
    }

    fn promotion_summary(&self, report: &PromotionReport) -> String {
        self.success(&format!(
            "Promoted {} value(s), skipped {}",
            report.promoted, report.skipped
        ))
    }

    /// Format stored table sizes.
    pub fn format_table_stats(&self, stats: &[TableStats]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = stats
                    .iter()
                    .map(|s| {
                        serde_json::json!({
                            "domain": s.domain,
                            "entries": s.entries,
                            "blank": s.blank,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(stats
                .iter()
                .map(|s| s.domain.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if stats.is_empty() {
                    return Ok(self.colorize("No rule tables found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Domain", "Entries", "Blank"]);
                for s in stats {
                    builder.push_record([s.domain.clone(), s.entries.to_string(), s.blank.to_string()]);
                }
                Ok(self.styled(builder))
            }
        }
    }

    /// Format the entries of one table.
    pub fn format_rule_table(&self, table: &RuleTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = table
                    .entries()
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "search_token": e.search_token,
                            "standard_value": e.standard_value,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(table
                .entries()
                .iter()
                .map(|e| e.search_token.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "Search Token", "Standard Value"]);
                for (position, entry) in table.entries().iter().enumerate() {
                    let standard = if entry.is_deletion() {
                        self.colorize("(delete)", "magenta")
                    } else {
                        entry.standard_value.clone()
                    };
                    builder.push_record([position.to_string(), entry.search_token.clone(), standard]);
                }
                Ok(self.styled(builder))
            }
        }
    }

    /// Format merge outcomes.
    pub fn format_merges(&self, outcomes: &[MergeOutcome]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcomes)?),
            OutputFormat::Quiet => Ok(outcomes
                .iter()
                .map(|o| o.record.key.clone())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if outcomes.is_empty() {
                    return Ok(self.colorize("No source sets found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Key", "Field", "Value", "Source", "Conflict"]);
                for outcome in outcomes {
                    for (field, provenance) in &outcome.provenance {
                        let value = outcome.record.value(field).to_string();
                        let source = provenance
                            .source
                            .map(|s| format!("{:?}", s).to_lowercase())
                            .unwrap_or_else(|| "cleared".to_string());
                        let conflict = if provenance.conflict {
                            self.colorize("yes", "yellow")
                        } else {
                            String::new()
                        };
                        builder.push_record([outcome.record.key.clone(), field.clone(), value, source, conflict]);
                    }
                }
                Ok(self.styled(builder))
            }
        }
    }

    /// Format quality reports.
    pub fn format_quality(&self, reports: &[QualityReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
            OutputFormat::Quiet => Ok(reports
                .iter()
                .map(|r| format!("{}\t{}", r.key, r.score))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if reports.is_empty() {
                    return Ok(self.colorize("No records found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Key", "Score", "Missing"]);
                for report in reports {
                    let color = match report.score {
                        80..=100 => "green",
                        50..=79 => "yellow",
                        _ => "red",
                    };
                    builder.push_record([
                        report.key.clone(),
                        self.colorize(&report.score.to_string(), color),
                        report.missing.join(", "),
                    ]);
                }
                Ok(self.styled(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn styled(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
