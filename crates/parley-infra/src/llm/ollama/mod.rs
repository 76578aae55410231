//! Ollama LLM provider.

pub mod client;
pub mod types;

pub use client::OllamaProvider;
