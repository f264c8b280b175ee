//! Curator CLI - Command-line interface for the catalog curation engine.

use clap::Parser;
use curator_cli::cli::log_filter;
use curator_cli::commands;
use curator_cli::{Cli, Command, Config, Formatter};
use curator_store::SqliteRuleStore;
use std::fs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> curator_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean; RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    // Load config
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let db = cli.db.as_deref();
    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter).await?;
        }
        Command::Merge(args) => {
            commands::execute_merge(args, &config, &formatter).await?;
        }
        Command::Score(args) => {
            commands::execute_score(args, &config, &formatter).await?;
        }
        Command::Rules(args) => {
            let mut store = open_store(&config, db)?;
            commands::execute_rules(args, &mut store, &formatter).await?;
        }
        Command::Dimensions(args) => {
            let mut store = open_store(&config, db)?;
            commands::execute_dimensions(args, &mut store, &formatter).await?;
        }
        Command::Process(args) => {
            let mut store = open_store(&config, db)?;
            commands::execute_process(args, &config, &mut store, &formatter).await?;
        }
        Command::Learn(args) => {
            let mut store = open_store(&config, db)?;
            commands::execute_learn(args, &config, &mut store, &formatter).await?;
        }
    }

    Ok(())
}

/// Open the rule store, creating its directory if needed.
fn open_store(config: &Config, explicit: Option<&str>) -> curator_cli::Result<SqliteRuleStore> {
    let path = config.database_path(explicit)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!("Opening rule store at {}", path.display());
    Ok(SqliteRuleStore::new(&path)?)
}
