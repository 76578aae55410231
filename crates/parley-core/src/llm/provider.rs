//! LlmProvider trait definition.
//!
//! This is the core abstraction that every language-model backend implements.

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Ollama, OpenAI-compatible, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `OllamaProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
