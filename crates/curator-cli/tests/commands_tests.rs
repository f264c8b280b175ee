//! End-to-end tests for the CLI commands against an on-disk store.

use curator_cli::cli::{
    ConfigAction, ConfigArgs, DimensionsAction, DimensionsArgs, LearnArgs, MergeArgs, ProcessArgs, RulesAction,
    RulesArgs, ScoreArgs,
};
use curator_cli::commands::{self, parse_records};
use curator_cli::config::OutputFormat;
use curator_cli::{CliError, Config, Formatter};
use curator_domain::{FieldValue, FlagReason, FlagStatus, UnmatchedValueFlag};
use curator_standardizer::GovernedField;
use curator_store::import::parse_rule_book;
use curator_store::SqliteRuleStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RULES: &str = r#"
[[tables]]
domain = "installation"
rules = [["UNDERMOUNT", "Undermount"], ["UNDER MOUNT", "Undermount"], ["TOPMOUNT", "Topmount"]]

[[tables]]
domain = "material"
rules = [["STAINLESS", "Stainless Steel"]]
"#;

const DIMENSIONS: &str = r#"[{"key": "SKU-1", "length": 800, "width": 450, "depth": 200}]"#;

const RECORDS: &str = r#"[
    {"key": "SKU-1", "fields": {"title": "Undermount sink", "installation": "under mount", "material": "stainless"}},
    {"key": "SKU-2", "fields": {"title": "Farmhouse sink", "installation": "Topmount", "material": "Fireclay"}},
    {"key": "SKU-3", "fields": {"installation": "Topmount"}}
]"#;

struct Workspace {
    dir: TempDir,
    config: Config,
    store: SqliteRuleStore,
    formatter: Formatter,
}

impl Workspace {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.standardizer.governed_fields = vec![
            GovernedField::new("installation", "installation"),
            GovernedField::new("material", "material"),
        ];
        let store = SqliteRuleStore::new(dir.path().join("curator.db")).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let mut ws = Self {
            dir,
            config,
            store,
            formatter,
        };
        let rules = ws.write("rules.toml", RULES);
        let dims = ws.write("dims.json", DIMENSIONS);

        commands::execute_rules(
            RulesArgs {
                action: RulesAction::Import {
                    file: rules,
                    replace: false,
                },
            },
            &mut ws.store,
            &ws.formatter,
        )
        .await
        .unwrap();
        commands::execute_dimensions(
            DimensionsArgs {
                action: DimensionsAction::Import { file: dims },
            },
            &mut ws.store,
            &ws.formatter,
        )
        .await
        .unwrap();
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, contents: &str) -> String {
        let path = self.path(name);
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn process_args(&self, input: String) -> ProcessArgs {
        ProcessArgs {
            input: Some(input),
            output: Some(path_str(&self.path("out.json"))),
            flags: Some(path_str(&self.path("flags.json"))),
            no_promote: false,
            dry_run: false,
            concurrency: Some(2),
        }
    }
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_process_writes_updated_records_and_promotes() {
    let mut ws = Workspace::new().await;
    let input = ws.write("records.json", RECORDS);
    let args = ws.process_args(input);

    commands::execute_process(args, &ws.config, &mut ws.store, &ws.formatter)
        .await
        .unwrap();

    let records = parse_records(&fs::read_to_string(ws.path("out.json")).unwrap()).unwrap();
    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.get("installation"), Some(&FieldValue::text("Undermount")));
    assert_eq!(first.get("material"), Some(&FieldValue::text("Stainless Steel")));
    assert_eq!(first.get("length"), Some(&FieldValue::Number(800.0)));
    assert_eq!(first.get("is_undermount"), Some(&FieldValue::Bool(true)));
    assert_eq!(first.get("bowl_volume_litres"), Some(&FieldValue::Number(72.0)));

    // Skipped record is written back untouched
    assert_eq!(records[2].fields.len(), 1);

    let flags: Vec<UnmatchedValueFlag> =
        serde_json::from_str(&fs::read_to_string(ws.path("flags.json")).unwrap()).unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].raw_value, "Fireclay");
    assert_eq!(flags[0].status, FlagStatus::Promoted);

    assert_eq!(ws.store.standard_value("material", "fireclay").unwrap(), Some(String::new()));
}

#[tokio::test]
async fn test_process_without_promotion_leaves_tables() {
    let mut ws = Workspace::new().await;
    let input = ws.write("records.json", RECORDS);
    let args = ProcessArgs {
        no_promote: true,
        ..ws.process_args(input)
    };

    commands::execute_process(args, &ws.config, &mut ws.store, &ws.formatter)
        .await
        .unwrap();

    assert_eq!(ws.store.standard_value("material", "fireclay").unwrap(), None);
}

#[tokio::test]
async fn test_process_rejects_empty_input() {
    let mut ws = Workspace::new().await;
    let input = ws.write("records.json", "[]");
    let args = ws.process_args(input);

    let result = commands::execute_process(args, &ws.config, &mut ws.store, &ws.formatter).await;
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[tokio::test]
async fn test_learn_then_curate() {
    let mut ws = Workspace::new().await;
    let flags = vec![UnmatchedValueFlag::new(
        "SKU-9",
        "material",
        "Granite",
        "material",
        FlagReason::NoRuleMatched,
    )];
    let input = ws.write("flags.json", &serde_json::to_string(&flags).unwrap());

    commands::execute_learn(
        LearnArgs {
            input: Some(input),
            dry_run: false,
            output: None,
        },
        &ws.config,
        &mut ws.store,
        &ws.formatter,
    )
    .await
    .unwrap();
    assert_eq!(ws.store.standard_value("material", "GRANITE").unwrap(), Some(String::new()));

    commands::execute_rules(
        RulesArgs {
            action: RulesAction::Curate {
                domain: "material".to_string(),
                token: "granite".to_string(),
                value: "Granite Composite".to_string(),
            },
        },
        &mut ws.store,
        &ws.formatter,
    )
    .await
    .unwrap();
    assert_eq!(
        ws.store.standard_value("material", "granite").unwrap(),
        Some("Granite Composite".to_string())
    );
}

#[tokio::test]
async fn test_learn_dry_run_appends_nothing() {
    let mut ws = Workspace::new().await;
    let flags = vec![UnmatchedValueFlag::new("SKU-9", "grade", "316L", "grade", FlagReason::RuleTableMissing)];
    let input = ws.write("flags.json", &serde_json::to_string(&flags).unwrap());
    let output = path_str(&ws.path("flags-out.json"));

    commands::execute_learn(
        LearnArgs {
            input: Some(input),
            dry_run: true,
            output: Some(output.clone()),
        },
        &ws.config,
        &mut ws.store,
        &ws.formatter,
    )
    .await
    .unwrap();

    assert_eq!(ws.store.standard_value("grade", "316L").unwrap(), None);
    let written: Vec<UnmatchedValueFlag> = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(written[0].status, FlagStatus::Pending);
}

#[tokio::test]
async fn test_curate_unknown_token_fails() {
    let mut ws = Workspace::new().await;
    let result = commands::execute_rules(
        RulesArgs {
            action: RulesAction::Curate {
                domain: "material".to_string(),
                token: "marble".to_string(),
                value: "Marble".to_string(),
            },
        },
        &mut ws.store,
        &ws.formatter,
    )
    .await;
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[tokio::test]
async fn test_export_round_trips_through_import_format() {
    let mut ws = Workspace::new().await;
    let output = path_str(&ws.path("export.toml"));

    commands::execute_rules(
        RulesArgs {
            action: RulesAction::Export {
                output: Some(output.clone()),
            },
        },
        &mut ws.store,
        &ws.formatter,
    )
    .await
    .unwrap();

    let book = parse_rule_book(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(book, parse_rule_book(RULES).unwrap());
}

#[tokio::test]
async fn test_merge_writes_records() {
    let ws = Workspace::new().await;
    let input = ws.write(
        "sources.json",
        r#"{"key": "SKU-1", "document": {"width": 450, "material": ""}, "page": {"width": 440, "title": "Sink"}}"#,
    );
    let output = path_str(&ws.path("merged.json"));

    commands::execute_merge(
        MergeArgs {
            input: Some(input),
            output: Some(output.clone()),
        },
        &ws.config,
        &ws.formatter,
    )
    .await
    .unwrap();

    let records = parse_records(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(records[0].get("width"), Some(&FieldValue::Number(450.0)));
    assert_eq!(records[0].get("title"), Some(&FieldValue::text("Sink")));
    assert_eq!(records[0].get("material"), Some(&FieldValue::Empty));
}

#[tokio::test]
async fn test_score_unknown_collection_fails() {
    let ws = Workspace::new().await;
    let input = ws.write("records.json", RECORDS);

    let result = commands::execute_score(
        ScoreArgs {
            input: Some(input),
            collection: "faucets".to_string(),
        },
        &ws.config,
        &ws.formatter,
    )
    .await;
    assert!(matches!(result, Err(CliError::Standardizer(_))));
}

#[tokio::test]
async fn test_config_init_refuses_overwrite() {
    let ws = Workspace::new().await;
    let path = ws.path("config").join("config.toml");
    let init = |force| ConfigArgs {
        action: ConfigAction::Init { force },
    };

    commands::execute_config(init(false), &ws.config, &path, &ws.formatter)
        .await
        .unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), Config::default());

    let result = commands::execute_config(init(false), &ws.config, &path, &ws.formatter).await;
    assert!(matches!(result, Err(CliError::InvalidInput(_))));

    commands::execute_config(init(true), &ws.config, &path, &ws.formatter)
        .await
        .unwrap();
}
