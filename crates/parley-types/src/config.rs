//! Configuration types for Parley.
//!
//! `AppConfig` represents the top-level `config.toml` in the data directory.
//! Every section and field has a default, so an empty or missing file yields
//! a relay that listens on `127.0.0.1:5000` and talks to a local Ollama.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Document store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Full sqlx database URL. Defaults to `{data_dir}/parley.db`.
    #[serde(default)]
    pub database_url: Option<String>,
}

impl StorageConfig {
    /// Resolve the database URL, falling back to a file in the data directory.
    pub fn database_url_or_default(&self, data_dir: &std::path::Path) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", data_dir.join("parley.db").display()),
        }
    }
}

/// Language-model backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderType,

    #[serde(default = "default_model")]
    pub model: String,

    /// Backend base URL. Provider-specific default when unset.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Name of the environment variable holding the API key
    /// (OpenAI-compatible backends only).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Optional system prompt prepended to every transcript.
    #[serde(default)]
    pub system_prompt: Option<String>,

    #[serde(default)]
    pub temperature: Option<f64>,

    /// HTTP timeout for a single backend call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            model: default_model(),
            base_url: None,
            api_key_env: default_api_key_env(),
            system_prompt: None,
            temperature: None,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}
