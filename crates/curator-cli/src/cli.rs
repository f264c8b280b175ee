//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// Curator CLI - Standardize, merge and score catalog records against rule tables.
#[derive(Debug, Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Rule store database path
    #[arg(long, global = true, env = "CURATOR_DB")]
    pub db: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (keys only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage rule tables
    Rules(RulesArgs),

    /// Manage the authoritative dimension lookup
    Dimensions(DimensionsArgs),

    /// Standardize records against the stored rules
    Process(ProcessArgs),

    /// Merge document and page extractions into records
    Merge(MergeArgs),

    /// Score record completeness
    Score(ScoreArgs),

    /// Promote unmatched-value flags into rule tables
    Learn(LearnArgs),

    /// Show or initialize the configuration file
    Config(ConfigArgs),
}

/// Arguments for rule table management.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub action: RulesAction,
}

/// Rule table actions.
#[derive(Debug, Subcommand)]
pub enum RulesAction {
    /// Import a TOML rule book
    Import {
        /// Rule book file
        file: String,

        /// Clear each imported domain before loading it
        #[arg(long)]
        replace: bool,
    },

    /// List tables, or the entries of one table
    List {
        /// Domain to list entries for
        domain: Option<String>,
    },

    /// Export every table as a TOML rule book
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Set the standard value of an existing entry
    Curate {
        /// Rule domain
        domain: String,

        /// Search token
        token: String,

        /// Standard value (empty string deletes matching values)
        value: String,
    },
}

/// Arguments for dimension management.
#[derive(Debug, Parser)]
pub struct DimensionsArgs {
    #[command(subcommand)]
    pub action: DimensionsAction,
}

/// Dimension lookup actions.
#[derive(Debug, Subcommand)]
pub enum DimensionsAction {
    /// Import dimension rows from a TOML or JSON file
    Import {
        /// Dimension file (`.json` is read as JSON, anything else as TOML)
        file: String,
    },
}

/// Arguments for the process command.
#[derive(Debug, Parser)]
pub struct ProcessArgs {
    /// JSON file with one record or an array of records (stdin if omitted)
    pub input: Option<String>,

    /// Write the updated records to this file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the raised flags to this file
    #[arg(long)]
    pub flags: Option<String>,

    /// Do not promote flags after the batch
    #[arg(long)]
    pub no_promote: bool,

    /// Report promotions without appending
    #[arg(long)]
    pub dry_run: bool,

    /// Rows processed concurrently
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,
}

/// Arguments for the merge command.
#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// JSON file with one source set or an array of source sets (stdin if omitted)
    pub input: Option<String>,

    /// Write the merged records to this file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// JSON file with one record or an array of records (stdin if omitted)
    pub input: Option<String>,

    /// Collection whose field set is scored
    #[arg(short = 'k', long, default_value = "sinks")]
    pub collection: String,
}

/// Arguments for the learn command.
#[derive(Debug, Parser)]
pub struct LearnArgs {
    /// JSON file with an array of flags (stdin if omitted)
    pub input: Option<String>,

    /// Report promotions without appending
    #[arg(long)]
    pub dry_run: bool,

    /// Write the flags, with their new status, to this file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

/// Log filter for a `-v` count
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_command() {
        let cli = Cli::parse_from(["curator", "process", "records.json", "--no-promote", "-j", "8"]);
        match cli.command {
            Command::Process(args) => {
                assert_eq!(args.input.as_deref(), Some("records.json"));
                assert!(args.no_promote);
                assert_eq!(args.concurrency, Some(8));
            }
            _ => panic!("Expected Process command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["curator", "rules", "list", "--format", "json", "--db", "c.db", "-vv"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.db.as_deref(), Some("c.db"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Rules(RulesArgs {
                action: RulesAction::List { domain },
            }) => assert!(domain.is_none()),
            _ => panic!("Expected Rules List command"),
        }
    }

    #[test]
    fn test_curate_accepts_blank_value() {
        let cli = Cli::parse_from(["curator", "rules", "curate", "material", "FIRECLAY", ""]);
        match cli.command {
            Command::Rules(RulesArgs {
                action: RulesAction::Curate { value, .. },
            }) => assert_eq!(value, ""),
            _ => panic!("Expected Rules Curate command"),
        }
    }

    #[test]
    fn test_score_default_collection() {
        let cli = Cli::parse_from(["curator", "score"]);
        match cli.command {
            Command::Score(args) => assert_eq!(args.collection, "sinks"),
            _ => panic!("Expected Score command"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["curator"]).is_err());
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0), "warn");
        assert_eq!(log_filter(1), "info");
        assert_eq!(log_filter(5), "trace");
    }
}
