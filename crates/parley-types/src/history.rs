//! Per-user raw message history.
//!
//! Stored on the user document as two string arrays with set-union
//! semantics, so an identical message recorded twice appears once.

use serde::{Deserialize, Serialize};

/// History arrays as returned by `GET /history/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub user: String,
    #[serde(default)]
    pub agent_history: Vec<String>,
    #[serde(default)]
    pub user_history: Vec<String>,
}

/// Messages to merge into a user's history. Empty strings are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub user_msg: Option<String>,
    #[serde(default)]
    pub agent_msg: Option<String>,
}

impl HistoryEntry {
    pub fn user_msg(&self) -> Option<&str> {
        self.user_msg.as_deref().filter(|m| !m.is_empty())
    }

    pub fn agent_msg(&self) -> Option<&str> {
        self.agent_msg.as_deref().filter(|m| !m.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.user_msg().is_none() && self.agent_msg().is_none()
    }
}
