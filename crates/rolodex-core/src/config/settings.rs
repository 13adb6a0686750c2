use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub app: AppConfig,
}

impl Config {
    /// Load config from file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        super::validation::warn_unknown_fields(&content, "config.json");
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// Where records come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Base URL of the hosted REST backend (e.g. `https://xyz.example.co`)
    #[serde(default)]
    pub url: Option<String>,

    /// API key sent as `apikey` and bearer token. Prefer `apiKeyEnv`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Local JSON records file; takes precedence over `url` when set
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

impl BackendConfig {
    /// Resolve the API key: explicit value first, then the environment.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.is_empty())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            api_key_env: default_api_key_env(),
            fixtures: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a lookup is dispatched
    #[serde(default = "default_debounce")]
    pub debounce_ms: u64,

    /// Queries shorter than this never reach the backend
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum records shown per category
    #[serde(default = "default_per_category_limit")]
    pub per_category_limit: usize,

    /// Upper bound on one fan-out lookup
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Length of the recent-searches log
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

impl SearchConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_api_key_env() -> String {
    "ROLODEX_API_KEY".to_string()
}
fn default_debounce() -> u64 {
    300
}
fn default_min_query_chars() -> usize {
    2
}
fn default_per_category_limit() -> usize {
    3
}
fn default_request_timeout() -> u64 {
    8000
}
fn default_max_recent() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce(),
            min_query_chars: default_min_query_chars(),
            per_category_limit: default_per_category_limit(),
            request_timeout_ms: default_request_timeout(),
            max_recent: default_max_recent(),
        }
    }
}

/// Host application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Web app origin prepended to navigation targets (e.g. `https://crm.example.com`)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Open confirmed targets with the platform opener
    #[serde(default)]
    pub open_in_browser: bool,
}
