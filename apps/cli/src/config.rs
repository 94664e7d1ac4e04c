use std::{collections::HashMap, fs};

use serde::Serialize;
use tracing::warn;

pub const CONFIG_FILE: &str = "bullets.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub api_base_url: String,
    pub database_url: String,
    pub history_key: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            database_url: "sqlite://./data/bullets.db".into(),
            history_key: client_core::history::DEFAULT_HISTORY_KEY.into(),
            request_timeout_secs: 120,
        }
    }
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(CONFIG_FILE).ok();
    resolve_settings(file.as_deref(), |name| std::env::var(name).ok())
}

/// Defaults, then the config file, then environment variables. Later
/// sources win; unparseable values are skipped.
pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, toml::Value>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url").and_then(toml::Value::as_str) {
                    settings.api_base_url = v.to_string();
                }
                if let Some(v) = file_cfg.get("database_url").and_then(toml::Value::as_str) {
                    settings.database_url = v.to_string();
                }
                if let Some(v) = file_cfg.get("history_key").and_then(toml::Value::as_str) {
                    settings.history_key = v.to_string();
                }
                if let Some(v) = file_cfg
                    .get("request_timeout_secs")
                    .and_then(toml::Value::as_integer)
                    .and_then(|v| u64::try_from(v).ok())
                {
                    settings.request_timeout_secs = v;
                }
            }
            Err(error) => warn!(%error, file = CONFIG_FILE, "ignoring unreadable config file"),
        }
    }

    if let Some(v) = env("BULLETS_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__HISTORY_KEY") {
        settings.history_key = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

/// Turns a bare path or `sqlite:` path into a `sqlite://` URL. URLs that
/// already carry a scheme, and in-memory URLs, pass through unchanged.
pub fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return Settings::default().database_url;
    }
    if raw.contains("://") || raw.starts_with("sqlite::memory:") {
        return raw.to_string();
    }
    let path = raw.strip_prefix("sqlite:").unwrap_or(raw).replace('\\', "/");
    format!("sqlite://{path}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
