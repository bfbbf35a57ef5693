use super::*;

#[test]
fn empty_document_yields_defaults() {
    let cfg = StageConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, StageConfig::default());
    cfg.validate().unwrap();
}

#[test]
fn partial_document_overrides_only_named_fields() {
    let json = r#"{ "header_offset": 64, "deep_link": { "deadline_ms": 9000 } }"#;
    let cfg = StageConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.header_offset, 64.0);
    assert_eq!(cfg.deep_link.deadline_ms, 9000);
    assert_eq!(cfg.deep_link.settle_ms, 100);
    assert_eq!(cfg.boot.preloader_hold_ms, 3500);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = StageConfig::from_reader("{ nope".as_bytes()).unwrap_err();
    assert!(matches!(err, StageError::Serde(_)));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = StageConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, StageError::Config(_)));
}

#[test]
fn duplicate_routes_are_rejected() {
    let json = r#"{ "routes": [
        { "path": "/", "section": "hero-layers" },
        { "path": "/about", "section": "a" },
        { "path": "/about", "section": "b" }
    ] }"#;
    let cfg = StageConfig::from_reader(json.as_bytes()).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_frame_interval_is_rejected() {
    let cfg = StageConfig {
        frame_interval_ms: 0,
        ..StageConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn template_without_placeholder_is_rejected() {
    let cfg = StageConfig {
        modal_embed_template: "https://example.invalid/embed".to_owned(),
        ..StageConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn threshold_outside_unit_interval_is_rejected() {
    let mut cfg = StageConfig::default();
    cfg.scroll.effect_visible_threshold = 1.0;
    assert!(cfg.validate().is_err());
}
