use super::{load_settings_with_env, normalize_api_base, ConfigError, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("mini_jira_config_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_means_same_origin_default() {
    let path = env::temp_dir().join("mini_jira_config_test_does_not_exist.toml");
    let settings = load_settings_with_env(&path, no_env).expect("defaults");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api_base, "");
}

#[test]
fn reads_api_base_from_file_and_trims_trailing_slash() {
    let path = temp_config("api_base = \"http://localhost:8000/\"\n");
    let settings = load_settings_with_env(&path, no_env).expect("load");
    assert_eq!(settings.api_base, "http://localhost:8000");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_config("api_base = \"http://localhost:8000\"\n");
    let vars = HashMap::from([
        ("MINI_JIRA_API", "http://bridge.internal:9000"),
        ("APP__API_BASE", "  "),
    ]);
    let settings =
        load_settings_with_env(&path, |key| vars.get(key).map(|v| v.to_string())).expect("load");
    assert_eq!(settings.api_base, "http://bridge.internal:9000");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn later_environment_variable_wins() {
    let path = env::temp_dir().join("mini_jira_config_test_env_order.toml");
    let vars = HashMap::from([
        ("MINI_JIRA_API", "http://first:1"),
        ("APP__API_BASE", "http://second:2"),
    ]);
    let settings =
        load_settings_with_env(&path, |key| vars.get(key).map(|v| v.to_string())).expect("load");
    assert_eq!(settings.api_base, "http://second:2");
}

#[test]
fn rejects_unparseable_file() {
    let path = temp_config("api_base = [\n");
    let err = load_settings_with_env(&path, no_env).expect_err("bad toml");
    assert!(matches!(err, ConfigError::Parse { .. }), "unexpected: {err}");
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn rejects_non_http_api_base() {
    assert!(matches!(
        normalize_api_base("ftp://example.com"),
        Err(ConfigError::InvalidApiBase { .. })
    ));
    assert!(normalize_api_base("not a url").is_err());
    assert_eq!(normalize_api_base("   ").expect("blank"), "");
}

#[test]
fn cli_override_ignores_blank_values() {
    let mut settings = Settings {
        api_base: "http://localhost:8000".to_string(),
    };
    settings.override_api_base(Some("")).expect("blank");
    settings.override_api_base(None).expect("none");
    assert_eq!(settings.api_base, "http://localhost:8000");

    settings
        .override_api_base(Some("https://jira.example.com/"))
        .expect("override");
    assert_eq!(settings.api_base, "https://jira.example.com");
}
