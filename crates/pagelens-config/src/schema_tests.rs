use super::*;

#[test]
fn test_defaults_match_core() {
    let config = Config::default();
    assert_eq!(config.snapshot.to_options(), SnapshotOptions::default());
    assert_eq!(config.render.to_options(), RenderOptions::default());
    assert_eq!(config.query.to_payload(), QueryPayload::default());
    assert_eq!(config.session.timeout(), Duration::from_secs(10));
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config: Config = toml::from_str(
        r#"
        [render]
        max_depth = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.render.max_depth, 4);
    assert_eq!(config.render.max_chars_total, 12_000);
    assert!(config.render.compact);
    assert_eq!(config.snapshot, SnapshotConfig::default());
}

#[test]
fn test_snapshot_section_to_options() {
    let config: Config = toml::from_str(
        r#"
        [snapshot]
        max_nodes = 50
        interactive_only = false
        cursor_interactive = true
        scope = "main"
        "#,
    )
    .unwrap();
    let options = config.snapshot.to_options();
    assert_eq!(options.max_nodes, 50);
    assert!(!options.interactive_only);
    assert!(options.cursor_interactive);
    assert_eq!(options.scope.as_deref(), Some("main"));
    assert_eq!(options.max_text_per_node, 200);
}

#[test]
fn test_serialize_round_trip_through_toml() {
    let mut config = Config::default();
    config.query.limit_chars = 64;
    config.session.timeout_ms = 250;
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("[query]"));
    assert!(!text.contains("scope"));
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
