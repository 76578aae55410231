//! Ollama `/api/chat` wire types.

use serde::{Deserialize, Serialize};

/// Non-streaming chat request body.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OllamaOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaMessage {
    pub role: String,
    pub content: String,
}

/// Sampling options. Only the fields Parley sets.
#[derive(Debug, Serialize)]
pub struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    #[serde(default)]
    pub model: String,
    pub message: OllamaMessage,
    /// Tokens in the prompt, when reported.
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    /// Tokens generated, when reported.
    #[serde(default)]
    pub eval_count: Option<u32>,
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct OllamaErrorResponse {
    pub error: String,
}
