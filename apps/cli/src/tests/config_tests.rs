use super::{normalize_database_url, resolve_settings, Settings};

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    assert_eq!(resolve_settings(None, env_from(&[])), Settings::default());
}

#[test]
fn file_values_override_defaults() {
    let file = r#"
        api_url = "https://bullets.example.com"
        history_key = "workHistory"
        request_timeout_secs = 30
    "#;
    let settings = resolve_settings(Some(file), env_from(&[]));
    assert_eq!(settings.api_base_url, "https://bullets.example.com");
    assert_eq!(settings.history_key, "workHistory");
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let file = r#"api_url = "https://from-file""#;
    let settings = resolve_settings(
        Some(file),
        env_from(&[
            ("BULLETS_API_URL", "https://from-env"),
            ("APP__API_URL", "https://from-app-env"),
            ("DATABASE_URL", "sqlite://./other.db"),
            ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]),
    );
    assert_eq!(settings.api_base_url, "https://from-app-env");
    assert_eq!(settings.database_url, "sqlite://./other.db");
    assert_eq!(settings.request_timeout_secs, 120);
}

#[test]
fn unreadable_file_falls_back_to_defaults() {
    let settings = resolve_settings(Some("this is = = not toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(
        normalize_database_url("sqlite:./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url("  "), Settings::default().database_url);
    assert_eq!(
        normalize_database_url(r"C:\data\bullets.db"),
        "sqlite://C:/data/bullets.db"
    );
    assert_eq!(
        normalize_database_url("sqlite://./data/test.db?mode=rwc"),
        "sqlite://./data/test.db?mode=rwc"
    );
}
