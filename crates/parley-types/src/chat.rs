//! User, chat session, and transcript types for Parley.
//!
//! A user owns any number of sessions; each session holds an ordered,
//! append-only transcript of role-tagged messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export the message types from the llm module (the transcript is sent to
// the backend verbatim).
pub use crate::llm::{Message, MessageRole};

/// The user document.
///
/// `sessions` is a denormalized cache of session ids; the sessions
/// sub-collection is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub sessions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_history: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agent_history: Vec<String>,
}

impl UserRecord {
    /// A freshly registered user with no sessions.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            sessions: Vec::new(),
            user_history: Vec::new(),
            agent_history: Vec::new(),
        }
    }
}

/// Result of a login: whether the user document was just created.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Created(UserRecord),
    Existing(UserRecord),
}

impl LoginOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, LoginOutcome::Created(_))
    }

    pub fn user(&self) -> &UserRecord {
        match self {
            LoginOutcome::Created(user) | LoginOutcome::Existing(user) => user,
        }
    }

    pub fn into_user(self) -> UserRecord {
        match self {
            LoginOutcome::Created(user) | LoginOutcome::Existing(user) => user,
        }
    }
}

/// A chat session document.
///
/// `created_at` and `updated_at` are assigned by the store. `updated_at` and
/// `last_reply` stay empty until the first completed turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Document id; not stored as a field.
    #[serde(default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub last_reply: Option<String>,
}
