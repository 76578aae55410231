//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (document store, LLM provider) that the
//! infrastructure layer implements, and the services built on them. It
//! depends only on `parley-types` -- never on `parley-infra` or any
//! database/IO crate.

pub mod chat;
pub mod llm;
pub mod store;
