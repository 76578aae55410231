//! Document paths for users and their sessions.

use parley_types::document::{CollectionPath, DocumentPath};
use parley_types::error::RepositoryError;
use parley_types::identity::UserKey;

pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";

/// `users/{key}`
pub fn user_doc(key: &UserKey) -> Result<DocumentPath, RepositoryError> {
    CollectionPath::root(USERS)?.doc(key.as_str())
}

/// `users/{key}/sessions`
pub fn sessions_collection(key: &UserKey) -> Result<CollectionPath, RepositoryError> {
    user_doc(key)?.collection(SESSIONS)
}

/// `users/{key}/sessions/{session_id}`
pub fn session_doc(key: &UserKey, session_id: &str) -> Result<DocumentPath, RepositoryError> {
    sessions_collection(key)?.doc(session_id)
}
