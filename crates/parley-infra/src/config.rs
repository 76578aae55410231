//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory (`~/.parley/` in production)
//! and deserializes it into [`AppConfig`]. Falls back to defaults when the
//! file is missing or malformed, then applies environment overrides.

use std::path::Path;

use parley_types::config::AppConfig;
use parley_types::llm::ProviderType;

/// Model name override.
pub const MODEL_ENV: &str = "OLLAMA_MODEL";
/// Backend base URL override.
pub const HOST_ENV: &str = "OLLAMA_HOST";
/// Database URL override.
pub const DATABASE_URL_ENV: &str = "PARLEY_DATABASE_URL";

/// Load configuration from `{data_dir}/config.toml` with environment
/// overrides applied.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config = load_config_file(data_dir).await;
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Load `{data_dir}/config.toml` without environment overrides.
///
/// - Missing file: returns [`AppConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are ignored. The `OLLAMA_*` variables only apply when the
/// Ollama provider is configured.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if config.llm.provider == ProviderType::Ollama {
        if let Some(model) = get(MODEL_ENV) {
            config.llm.model = model;
        }
        if let Some(host) = get(HOST_ENV) {
            config.llm.base_url = Some(normalize_host(&host));
        }
    }
    if let Some(url) = get(DATABASE_URL_ENV) {
        config.storage.database_url = Some(url);
    }
    config
}

/// `OLLAMA_HOST` is commonly set as a bare `host:port`.
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
