//! Per-user raw message history.
//!
//! Addressed by the literal username from the request path, not by the key
//! derived from an email. Messages are merged with array-union semantics, so
//! repeating a message text does not record it twice.

use parley_types::document::{Fields, FieldWrites};
use parley_types::error::RelayError;
use parley_types::history::{ConversationHistory, HistoryEntry};
use parley_types::identity::UserKey;
use serde_json::Value;
use tracing::debug;

use crate::store::document::DocumentStore;

use super::paths::user_doc;

const USER_HISTORY: &str = "user_history";
const AGENT_HISTORY: &str = "agent_history";

/// Reads and appends the history arrays on user documents.
#[derive(Clone)]
pub struct HistoryService<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> HistoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Fetch both history arrays for `username`.
    pub async fn get_history(&self, username: &str) -> Result<ConversationHistory, RelayError> {
        let key = UserKey::from_raw(username);
        // A username that cannot address a document cannot belong to a user.
        let path = user_doc(&key).map_err(|_| RelayError::UserNotFound)?;
        let doc = self.store.get(&path).await?.ok_or(RelayError::UserNotFound)?;

        Ok(ConversationHistory {
            user: username.to_string(),
            agent_history: string_array(&doc.fields, AGENT_HISTORY),
            user_history: string_array(&doc.fields, USER_HISTORY),
        })
    }

    /// Merge the non-empty messages of `entry` into the user's history.
    pub async fn add_history(&self, username: &str, entry: &HistoryEntry) -> Result<(), RelayError> {
        let key = UserKey::from_raw(username);
        let path = user_doc(&key).map_err(|_| RelayError::UserNotFound)?;
        if self.store.get(&path).await?.is_none() {
            return Err(RelayError::UserNotFound);
        }

        let mut writes = FieldWrites::new();
        if let Some(msg) = entry.user_msg() {
            writes = writes.array_union(USER_HISTORY, vec![Value::from(msg)]);
        }
        if let Some(msg) = entry.agent_msg() {
            writes = writes.array_union(AGENT_HISTORY, vec![Value::from(msg)]);
        }

        if writes.is_empty() {
            debug!(user = %key, "No history to record");
            return Ok(());
        }

        self.store.set(&path, &writes, true).await?;
        Ok(())
    }
}

fn string_array(fields: &Fields, name: &str) -> Vec<String> {
    fields
        .get(name)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
