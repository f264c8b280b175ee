//! Integration tests for the merger

#[cfg(test)]
mod tests {
    use crate::{parse_source_sets, DualSourceMerger, MergeConfig, MergeError};
    use curator_domain::{ExtractionSource, FieldMap, FieldPriority, FieldValue, ProductRecord};

    fn fields(pairs: &[(&str, FieldValue)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn merger(config: MergeConfig) -> DualSourceMerger {
        DualSourceMerger::new(config).unwrap()
    }

    #[test]
    fn test_document_first_prefers_document() {
        let m = merger(MergeConfig::default().with_field("material", FieldPriority::DocumentFirst));
        let outcome = m.merge_sources(
            "SKU-1",
            fields(&[("material", FieldValue::text("Ceramic"))]),
            fields(&[("material", FieldValue::text("Stone"))]),
        );
        assert_eq!(outcome.record.get("material"), Some(&FieldValue::text("Ceramic")));
        assert_eq!(outcome.provenance["material"].source, Some(ExtractionSource::Document));
        assert!(outcome.provenance["material"].conflict);
    }

    #[test]
    fn test_document_first_falls_back_when_document_blank() {
        let m = merger(MergeConfig::default().with_field("material", FieldPriority::DocumentFirst));
        let outcome = m.merge_sources(
            "SKU-1",
            fields(&[("material", FieldValue::text(""))]),
            fields(&[("material", FieldValue::text("Stone"))]),
        );
        assert_eq!(outcome.record.get("material"), Some(&FieldValue::text("Stone")));
        assert_eq!(outcome.provenance["material"].source, Some(ExtractionSource::Page));
        assert!(!outcome.provenance["material"].conflict);
    }

    #[test]
    fn test_page_first() {
        let m = merger(MergeConfig::page_preferred());
        let outcome = m.merge_sources(
            "SKU-1",
            fields(&[("colour", FieldValue::text("Black")), ("width", FieldValue::Number(450.0))]),
            fields(&[("colour", FieldValue::text("Matte Black")), ("width", FieldValue::Number(455.0))]),
        );
        assert_eq!(outcome.record.get("colour"), Some(&FieldValue::text("Matte Black")));
        // dimensions keep document-first even in the page preset
        assert_eq!(outcome.record.get("width"), Some(&FieldValue::Number(450.0)));
        assert_eq!(outcome.conflicts().count(), 2);
    }

    #[test]
    fn test_first_non_empty_uses_tiebreak() {
        let mut config = MergeConfig::default();
        let both = (
            fields(&[("title", FieldValue::text("Doc title"))]),
            fields(&[("title", FieldValue::text("Page title"))]),
        );

        let outcome = merger(config.clone()).merge_sources("SKU-1", both.0.clone(), both.1.clone());
        assert_eq!(outcome.record.get("title"), Some(&FieldValue::text("Doc title")));

        config.tiebreak = ExtractionSource::Page;
        let outcome = merger(config).merge_sources("SKU-1", both.0, both.1);
        assert_eq!(outcome.record.get("title"), Some(&FieldValue::text("Page title")));
    }

    #[test]
    fn test_first_non_empty_takes_the_only_value() {
        let outcome = merger(MergeConfig::default()).merge_sources(
            "SKU-1",
            fields(&[("title", FieldValue::Empty)]),
            fields(&[("title", FieldValue::text("Page title"))]),
        );
        assert_eq!(outcome.record.get("title"), Some(&FieldValue::text("Page title")));
    }

    #[test]
    fn test_false_and_zero_are_values() {
        let m = merger(MergeConfig::page_preferred());
        let outcome = m.merge_sources(
            "SKU-1",
            fields(&[("is_topmount", FieldValue::Bool(true)), ("tap_holes", FieldValue::Number(1.0))]),
            fields(&[("is_topmount", FieldValue::Bool(false)), ("tap_holes", FieldValue::Number(0.0))]),
        );
        assert_eq!(outcome.record.get("is_topmount"), Some(&FieldValue::Bool(false)));
        assert_eq!(outcome.record.get("tap_holes"), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn test_absent_vs_explicitly_cleared() {
        let outcome = merger(MergeConfig::default()).merge_sources(
            "SKU-1",
            fields(&[("warranty", FieldValue::text("  "))]),
            FieldMap::new(),
        );
        assert_eq!(outcome.record.get("warranty"), Some(&FieldValue::Empty));
        assert_eq!(outcome.provenance["warranty"].source, None);
        assert!(outcome.record.get("material").is_none());
        assert!(!outcome.provenance.contains_key("material"));
    }

    #[test]
    fn test_apply_to_existing_record() {
        let outcome = merger(MergeConfig::default()).merge_sources(
            "SKU-1",
            fields(&[("warranty", FieldValue::Empty), ("material", FieldValue::text("Granite"))]),
            FieldMap::new(),
        );
        let mut record = ProductRecord::new("SKU-1")
            .with_field("warranty", "10 years")
            .with_field("title", "Sink");
        outcome.apply_to(&mut record);

        assert_eq!(record.get("warranty"), Some(&FieldValue::Empty));
        assert_eq!(record.get("material"), Some(&FieldValue::text("Granite")));
        assert_eq!(record.get("title"), Some(&FieldValue::text("Sink")));
    }

    #[test]
    fn test_count_from() {
        let outcome = merger(MergeConfig::default()).merge_sources(
            "SKU-1",
            fields(&[("a", FieldValue::text("x")), ("b", FieldValue::text("y"))]),
            fields(&[("c", FieldValue::text("z"))]),
        );
        assert_eq!(outcome.count_from(ExtractionSource::Document), 2);
        assert_eq!(outcome.count_from(ExtractionSource::Page), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = MergeConfig::default();
        config.dimension_fields.push(String::new());
        assert!(matches!(DualSourceMerger::new(config), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_parse_single_and_array() {
        let single = parse_source_sets(
            r#"{"key": "SKU-1", "document": {"width": 450}, "page": {"width": "455", "in_stock": true}}"#,
        )
        .unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].page.get("in_stock"), Some(&FieldValue::Bool(true)));

        let many = parse_source_sets(r#"[{"key": "A"}, {"key": "B", "page": {"title": null}}]"#).unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[1].page.get("title"), Some(&FieldValue::Empty));
    }

    #[test]
    fn test_parse_rejects_missing_key() {
        assert!(matches!(
            parse_source_sets(r#"[{"key": "A"}, {"key": " "}]"#),
            Err(MergeError::MissingKey(1))
        ));
        assert!(matches!(parse_source_sets("not json"), Err(MergeError::JsonParse(_))));
    }

    #[test]
    fn test_merge_all_preserves_order() {
        let sets = parse_source_sets(r#"[{"key": "B"}, {"key": "A"}]"#).unwrap();
        let outcomes = merger(MergeConfig::default()).merge_all(&sets);
        assert_eq!(outcomes[0].record.key, "B");
        assert_eq!(outcomes[1].record.key, "A");
    }
}
