//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley relay:
//! user identity keys, chat sessions and transcripts, history records, the
//! document-store value model, LLM request/response shapes, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod document;
pub mod error;
pub mod history;
pub mod identity;
pub mod llm;
