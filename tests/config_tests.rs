// Config loading and validation tests

use dockstats::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 2112
host = "0.0.0.0"

[monitoring]
discovery_interval_secs = 30
stats_interval_secs = 15
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 2112);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.monitoring.discovery_interval_secs, 30);
    assert_eq!(config.monitoring.stats_interval_secs, 15);
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str("").expect("empty config uses defaults");
    assert_eq!(config.server.port, 2112);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.monitoring.discovery_interval_secs, 30);
    assert_eq!(config.monitoring.stats_interval_secs, 15);
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[server]\nport = 9000\n").expect("partial");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.monitoring.stats_interval_secs, 15);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 2112", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_host() {
    let bad = VALID_CONFIG.replace("host = \"0.0.0.0\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.host"));
}

#[test]
fn test_config_validation_rejects_discovery_interval_zero() {
    let bad = VALID_CONFIG.replace("discovery_interval_secs = 30", "discovery_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("discovery_interval_secs"));
}

#[test]
fn test_config_validation_rejects_stats_interval_zero() {
    let bad = VALID_CONFIG.replace("stats_interval_secs = 15", "stats_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_interval_secs"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}
