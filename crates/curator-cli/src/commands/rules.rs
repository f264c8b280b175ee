//! Rules command implementation.

use crate::cli::{RulesAction, RulesArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_domain::traits::RuleStore;
use curator_store::import::{export_rule_book, parse_rule_book};
use curator_store::SqliteRuleStore;
use std::fs;

/// Execute the rules command.
pub async fn execute_rules(args: RulesArgs, store: &mut SqliteRuleStore, formatter: &Formatter) -> Result<()> {
    match args.action {
        RulesAction::Import { file, replace } => import_rules(store, &file, replace, formatter),
        RulesAction::List { domain: None } => {
            println!("{}", formatter.format_table_stats(&store.table_stats()?)?);
            Ok(())
        }
        RulesAction::List { domain: Some(domain) } => {
            let table = store
                .load_table(&domain)?
                .ok_or_else(|| CliError::InvalidInput(format!("No rule table '{}'", domain)))?;
            println!("{}", formatter.format_rule_table(&table)?);
            Ok(())
        }
        RulesAction::Export { output } => export_rules(store, output.as_deref(), formatter),
        RulesAction::Curate { domain, token, value } => curate(store, &domain, &token, &value, formatter),
    }
}

/// Load a TOML rule book into the store.
fn import_rules(store: &mut SqliteRuleStore, file: &str, replace: bool, formatter: &Formatter) -> Result<()> {
    let contents = fs::read_to_string(file)?;
    let book = parse_rule_book(&contents)?;
    let summary = store.import_rules(&book, replace)?;

    println!(
        "{}",
        formatter.success(&format!(
            "Imported {} entries into {} table(s), {} duplicate(s) skipped",
            summary.inserted, summary.tables, summary.skipped
        ))
    );
    Ok(())
}

/// Write every stored table as a TOML rule book.
fn export_rules(store: &SqliteRuleStore, output: Option<&str>, formatter: &Formatter) -> Result<()> {
    let snapshot = store.load_snapshot()?;
    let toml = export_rule_book(&snapshot.rules)?;

    match output {
        Some(path) => {
            fs::write(path, toml)?;
            println!(
                "{}",
                formatter.success(&format!("Exported {} table(s) to {}", snapshot.rules.len(), path))
            );
        }
        None => print!("{}", toml),
    }
    Ok(())
}

/// Set the standard value of an entry that already exists.
fn curate(store: &mut SqliteRuleStore, domain: &str, token: &str, value: &str, formatter: &Formatter) -> Result<()> {
    if !store.curate(domain, token, value)? {
        return Err(CliError::InvalidInput(format!(
            "'{}' is not in the '{}' table",
            token, domain
        )));
    }

    let message = if value.trim().is_empty() {
        format!("{} / {} now deletes matching values", domain, token)
    } else {
        format!("{} / {} → {}", domain, token, value.trim())
    };
    println!("{}", formatter.success(&message));
    Ok(())
}
