//! CLI configuration.

use anyhow::{Context, Result};
use catalog_core::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use catalog_query::{DEFAULT_DEBOUNCE, DEFAULT_DETAIL_CONCURRENCY};
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Product store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Query resolution.
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging and output.
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Check the config. Returns `(errors, warnings)`.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !(self.store.base_url.starts_with("http://")
            || self.store.base_url.starts_with("https://"))
        {
            errors.push("store.base_url must be an http(s) URL".to_string());
        }
        if self.store.timeout_ms == 0 {
            errors.push("store.timeout_ms must be greater than 0".to_string());
        }
        if self.store.connect_timeout_ms > self.store.timeout_ms {
            warnings.push("store.connect_timeout_ms exceeds store.timeout_ms".to_string());
        }
        if self.query.page_size == 0 || self.query.page_size > MAX_PAGE_SIZE {
            errors.push(format!("query.page_size must be 1-{}", MAX_PAGE_SIZE));
        }
        if self.query.detail_concurrency == 0 {
            errors.push("query.detail_concurrency must be at least 1".to_string());
        }
        if self.query.debounce_ms < 100 {
            warnings.push(format!(
                "query.debounce_ms {} is short enough to query on every keystroke",
                self.query.debounce_ms
            ));
        }

        (errors, warnings)
    }
}

/// Product store connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the public store API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Host that relative image paths resolve against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_base_url: Option<String>,

    /// Whole-request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection timeout.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retry budget for every endpoint. Unset keeps the per-endpoint defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            media_base_url: None,
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_retries: None,
        }
    }
}

/// Query resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Products per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a typed search is applied.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Detail fetches in flight during the flavor + weight re-check.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

fn default_detail_concurrency() -> usize {
    DEFAULT_DETAIL_CONCURRENCY
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

/// Logging and output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Log line format on stderr.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Catalog CLI configuration
# Generated {generated}

[store]
base_url = "{base_url}"
# media_base_url = "https://cdn.example.com"
timeout_ms = {timeout_ms}
connect_timeout_ms = {connect_timeout_ms}
# max_retries = 1

[query]
page_size = {page_size}
debounce_ms = {debounce_ms}
detail_concurrency = {detail_concurrency}

[output]
log_format = "human"
log_level = "warn"
"#,
        generated = chrono::Utc::now().format("%Y-%m-%d"),
        base_url = base_url,
        timeout_ms = default_timeout_ms(),
        connect_timeout_ms = default_connect_timeout_ms(),
        page_size = default_page_size(),
        debounce_ms = default_debounce_ms(),
        detail_concurrency = default_detail_concurrency(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let content = generate_default_config("http://localhost:5000/api");
        let config: CliConfig = toml::from_str(&content).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
[store]
base_url = "https://shop.example.com/api"
max_retries = 3

[output]
log_format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.store.base_url, "https://shop.example.com/api");
        assert_eq!(config.store.max_retries, Some(3));
        assert_eq!(config.store.timeout_ms, 10_000);
        assert_eq!(config.query.page_size, 20);
        assert_eq!(config.query.debounce_ms, 350);
        assert_eq!(config.output.log_format, LogFormat::Json);
    }

    #[test]
    fn test_json_config() {
        let config: CliConfig =
            serde_json::from_str(r#"{"query": {"detail_concurrency": 2}}"#).unwrap();
        assert_eq!(config.query.detail_concurrency, 2);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_validate() {
        let (errors, warnings) = CliConfig::default().validate();
        assert!(errors.is_empty());
        assert!(warnings.is_empty());

        let mut config = CliConfig::default();
        config.store.base_url = "localhost".to_string();
        config.query.page_size = 500;
        config.query.debounce_ms = 10;
        let (errors, warnings) = config.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(warnings.len(), 1);
    }
}
