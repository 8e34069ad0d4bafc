use recepta::infrastructure::observability::TracingConfig;

#[test]
fn given_json_requested_when_building_config_then_json_is_enabled() {
    let config = TracingConfig::new("prod", true);

    assert_eq!(config.environment, "prod");
    assert!(config.json_format);
}
