//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`:
//! the SQLite document store, the Ollama and OpenAI-compatible LLM
//! providers, plus configuration loading and data-directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
