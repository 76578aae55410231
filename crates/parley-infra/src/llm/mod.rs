//! Language-model provider implementations.
//!
//! - Ollama (`/api/chat`) via reqwest
//! - OpenAI-compatible chat completions via async-openai
//!
//! [`create_provider`] builds the configured backend as a [`BoxLlmProvider`].

pub mod ollama;
pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::LlmConfig;
use parley_types::llm::{LlmError, ProviderType};

use self::ollama::OllamaProvider;
use self::openai_compat::OpenAiCompatibleProvider;

/// Build the configured provider.
///
/// `api_key` is only consulted for OpenAI-compatible backends, where it is
/// required.
pub fn create_provider(config: &LlmConfig, api_key: Option<&str>) -> Result<BoxLlmProvider, LlmError> {
    match config.provider {
        ProviderType::Ollama => {
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(ollama::client::DEFAULT_BASE_URL);
            let provider = OllamaProvider::new(
                base_url,
                config.model.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?;
            tracing::info!(provider = %config.provider, base_url, model = %config.model, "LLM provider configured");
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::OpenAiCompatible => {
            let key = api_key
                .filter(|k| !k.is_empty())
                .ok_or(LlmError::AuthenticationFailed)?;
            let secret = SecretString::from(key.to_string());

            let oai_config = match config.base_url.as_deref() {
                Some(base_url) => openai_compat::config::custom(secret, base_url, &config.model),
                None => openai_compat::config::openai_defaults(secret, &config.model),
            };
            tracing::info!(
                provider = %oai_config.provider_name,
                base_url = %oai_config.base_url,
                model = %config.model,
                "LLM provider configured"
            );
            Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_ollama() {
        let provider = create_provider(&LlmConfig::default(), None).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_openai_requires_key() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            ..LlmConfig::default()
        };
        assert!(matches!(
            create_provider(&config, None),
            Err(LlmError::AuthenticationFailed)
        ));
        assert!(matches!(
            create_provider(&config, Some("")),
            Err(LlmError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_openai_with_custom_base_url() {
        let config = LlmConfig {
            provider: ProviderType::OpenAiCompatible,
            base_url: Some("http://localhost:8000/v1".into()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, Some("sk-test")).unwrap();
        assert_eq!(provider.name(), "openai_compatible");
    }
}
