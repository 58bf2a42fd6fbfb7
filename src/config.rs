//! Client configuration loaded from TOML

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "JYOTISH_GRAPH_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    /// Backend origin, without the `/api/v1` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSection {
    /// Quiet period after the last keystroke before a lookup fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// A lookup needs strictly more trimmed characters than this
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySection {
    /// chrono format string for dasha boundaries
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_chars() -> usize {
    2
}

fn default_date_format() -> String {
    "%x".to_string()
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
        }
    }
}

impl ApiSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SearchSection {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Load from `$JYOTISH_GRAPH_CONFIG` or the platform config dir.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(path) => PathBuf::from(path),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "jyotish-graph", "jyotish-graph")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.search.debounce(), Duration::from_millis(500));
        assert_eq!(config.search.min_query_chars, 2);
        assert_eq!(config.display.date_format, "%x");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://jyotish.example.org"

            [search]
            debounce_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://jyotish.example.org");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.min_query_chars, 2);
        assert_eq!(config.display.date_format, "%x");
    }
}
