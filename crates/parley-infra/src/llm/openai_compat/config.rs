//! Configuration for OpenAI-compatible providers.

use secrecy::SecretString;

/// Default OpenAI endpoint.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible LLM provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name used in logs and spans.
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Default model, used when a request leaves the model empty.
    pub model: String,
}

/// OpenAI default configuration.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: OPENAI_BASE_URL.into(),
        api_key,
        model: model.into(),
    }
}

/// Any other server speaking the chat completions protocol
/// (vLLM, LM Studio, llama.cpp server, hosted gateways).
pub fn custom(api_key: SecretString, base_url: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai_compatible".into(),
        base_url: base_url.trim_end_matches('/').into(),
        api_key,
        model: model.into(),
    }
}
