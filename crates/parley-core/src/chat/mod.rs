//! Chat sessions, the chat relay, and per-user history.
//!
//! Document layout:
//! - `users/{key}`: `{email, sessions, user_history?, agent_history?}`
//! - `users/{key}/sessions/{id}`: `{created_at, messages, updated_at?, last_reply?}`

pub mod history;
pub mod paths;
pub mod service;
pub mod sessions;
