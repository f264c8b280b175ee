//! Integration tests for curator-store
//!
//! These tests verify rule tables and dimensions survive the SQLite round trip.

use curator_domain::traits::RuleStore;
use curator_domain::{DimensionEntry, DimensionLookup, FieldValue, RuleBook, RuleEntry, RuleTable};
use curator_store::import::{parse_dimensions, parse_rule_book, DocumentFormat};
use curator_store::SqliteRuleStore;

fn installation_book() -> RuleBook {
    RuleBook::new().with_table(RuleTable::from_pairs(
        "installation",
        [
            ("TOPMOUNT", "Topmount"),
            ("UNDERMOUNT", "Undermount"),
            ("FLUSHMOUNT", ""),
        ],
    ))
}

#[test]
fn test_store_initialization() {
    let store = SqliteRuleStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert!(store.unwrap().domains().unwrap().is_empty());
}

#[test]
fn test_import_and_load_preserves_order() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    let summary = store.import_rules(&installation_book(), false).unwrap();
    assert_eq!(summary.inserted, 3);

    let table = store.load_table("installation").unwrap().unwrap();
    let tokens: Vec<&str> = table.entries().iter().map(|e| e.search_token.as_str()).collect();
    assert_eq!(tokens, vec!["TOPMOUNT", "UNDERMOUNT", "FLUSHMOUNT"]);
    assert!(table.entries()[2].is_deletion());

    assert!(store.load_table("material").unwrap().is_none());
    assert_eq!(store.domains().unwrap(), vec!["installation"]);
}

#[test]
fn test_append_rejects_case_insensitive_duplicate() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    store.import_rules(&installation_book(), false).unwrap();

    assert!(!store.append_rule("installation", RuleEntry::pending("topmount")).unwrap());
    assert!(store.append_rule("Installation", RuleEntry::pending("Wall hung")).unwrap());
    assert!(!store.append_rule("installation", RuleEntry::pending(" WALL HUNG ")).unwrap());

    let table = store.load_table("installation").unwrap().unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.entries()[3].search_token, "WALL HUNG");
    // the existing standard value is untouched
    assert_eq!(table.entries()[0].standard_value, "Topmount");
}

#[test]
fn test_append_creates_missing_table() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    assert!(store.append_rule("grade", RuleEntry::pending("316L")).unwrap());
    assert!(!store.append_rule("grade", RuleEntry::pending("")).unwrap());
    assert_eq!(store.load_table("grade").unwrap().unwrap().len(), 1);
}

#[test]
fn test_replace_import() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    store.import_rules(&installation_book(), false).unwrap();

    let replacement = RuleBook::new().with_table(RuleTable::from_pairs("installation", [("DROP IN", "Topmount")]));
    let summary = store.import_rules(&replacement, true).unwrap();
    assert_eq!(summary.inserted, 1);
    assert_eq!(store.load_table("installation").unwrap().unwrap().len(), 1);

    let again = store.import_rules(&replacement, false).unwrap();
    assert_eq!(again.skipped, 1);
}

#[test]
fn test_curate_pending_entry() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    store.append_rule("material", RuleEntry::pending("Fireclay")).unwrap();

    let stats = store.table_stats().unwrap();
    assert_eq!(stats[0].blank, 1);

    assert!(store.curate("material", "fireclay", "Fireclay Ceramic").unwrap());
    assert!(!store.curate("material", "granite", "Granite").unwrap());
    assert_eq!(
        store.standard_value("material", "FIRECLAY").unwrap(),
        Some("Fireclay Ceramic".to_string())
    );
    assert_eq!(store.table_stats().unwrap()[0].blank, 0);
}

#[test]
fn test_dimensions_round_trip_keeps_malformed_values() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    let lookup = DimensionLookup::new()
        .with_entry("SKU-1", DimensionEntry::numeric(800.0, 450.0, 200.0))
        .with_entry(
            "SKU-2",
            DimensionEntry {
                length: Some(FieldValue::text("n/a")),
                width: None,
                depth: Some(FieldValue::Number(180.5)),
            },
        );

    assert_eq!(store.import_dimensions(&lookup).unwrap(), 2);
    assert_eq!(store.dimension_count().unwrap(), 2);

    let loaded = store.load_dimensions().unwrap();
    assert_eq!(loaded.get("SKU-1").unwrap().width, Some(FieldValue::Number(450.0)));
    let second = loaded.get("SKU-2").unwrap();
    assert_eq!(second.length, Some(FieldValue::text("n/a")));
    assert_eq!(second.width, None);
    assert_eq!(second.depth, Some(FieldValue::Number(180.5)));
}

#[test]
fn test_snapshot_from_store() {
    let mut store = SqliteRuleStore::new(":memory:").unwrap();
    store.import_rules(&installation_book(), false).unwrap();
    store
        .import_dimensions(&DimensionLookup::new().with_entry("SKU-1", DimensionEntry::numeric(1.0, 2.0, 3.0)))
        .unwrap();

    let snapshot = store.load_snapshot().unwrap();
    assert_eq!(snapshot.rules.len(), 1);
    assert_eq!(snapshot.dimensions.len(), 1);
}

#[test]
fn test_persistence_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curator.db");

    {
        let mut store = SqliteRuleStore::new(&path).unwrap();
        let book = parse_rule_book(
            r#"
            [[tables]]
            domain = "material"
            rules = [["STAINLESS", "Stainless Steel"], ["GRANITE", "Granite Composite"]]
            "#,
        )
        .unwrap();
        store.import_rules(&book, false).unwrap();
        let dims = parse_dimensions(r#"[{"key": "SKU-9", "width": 440}]"#, DocumentFormat::Json).unwrap();
        store.import_dimensions(&dims).unwrap();
    }

    let store = SqliteRuleStore::new(&path).unwrap();
    assert_eq!(store.load_table("material").unwrap().unwrap().len(), 2);
    assert_eq!(
        store.load_dimensions().unwrap().get("SKU-9").unwrap().width,
        Some(FieldValue::Number(440.0))
    );
}
