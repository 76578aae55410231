//! Session store accessor.
//!
//! SessionStore maps the user/session lifecycle onto document-store reads
//! and writes: login (ensure the user document), session listing and
//! creation, and transcript load/save for the chat relay.
//!
//! The sessions sub-collection is the authoritative list of a user's
//! sessions. The `sessions` array on the user document is a cache that is
//! extended on creation and rewritten on every listing, so it may lag
//! between listings.

use parley_types::chat::{ChatSession, LoginOutcome, Message, UserRecord};
use parley_types::document::{DocumentPath, FieldWrites};
use parley_types::error::{RelayError, RepositoryError};
use parley_types::identity::UserKey;
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::document::DocumentStore;

use super::paths::{session_doc, sessions_collection, user_doc};

/// Reads and writes users and their chat sessions.
///
/// Generic over `DocumentStore` so that parley-core never depends on
/// parley-infra.
#[derive(Clone)]
pub struct SessionStore<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying document store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the user document on first login.
    ///
    /// Returns `Created` with the new record, or `Existing` with the stored
    /// document when the user already exists. Never overwrites.
    pub async fn ensure_user(&self, email: &str) -> Result<LoginOutcome, RelayError> {
        let key = UserKey::from_email(email)?;
        let email = email.trim();
        let path = user_doc(&key)?;

        if let Some(doc) = self.store.get(&path).await? {
            debug!(user = %key, "Existing user logged in");
            return Ok(LoginOutcome::Existing(doc.decode()?));
        }

        let writes = FieldWrites::new()
            .value("email", email)
            .value("sessions", Value::Array(Vec::new()));
        self.store.set(&path, &writes, false).await?;
        info!(user = %key, "Created user");

        Ok(LoginOutcome::Created(UserRecord::new(email)))
    }

    /// Whether a user document exists for `key`.
    pub async fn user_exists(&self, key: &UserKey) -> Result<bool, RelayError> {
        Ok(self.store.get(&user_doc(key)?).await?.is_some())
    }

    /// List the ids of the user's sessions.
    ///
    /// An unknown user has no sessions (not an error). The enumerated ids are
    /// merged back into the user document's `sessions` cache.
    pub async fn list_sessions(&self, email: &str) -> Result<Vec<String>, RelayError> {
        let key = UserKey::from_email(email)?;
        let path = user_doc(&key)?;

        if self.store.get(&path).await?.is_none() {
            return Ok(Vec::new());
        }

        let ids = self.store.list(&sessions_collection(&key)?).await?;
        let writes = FieldWrites::new().value("sessions", Value::from(ids.clone()));
        self.store.set(&path, &writes, true).await?;

        Ok(ids)
    }

    /// Create an empty session for an existing user and return its id.
    pub async fn create_session(&self, email: &str) -> Result<String, RelayError> {
        let key = UserKey::from_email(email)?;
        if !self.user_exists(&key).await? {
            return Err(RelayError::UserNotFound);
        }

        let session_id = Uuid::new_v4().to_string();
        let writes = FieldWrites::new()
            .server_timestamp("created_at")
            .value("messages", Value::Array(Vec::new()));
        self.store
            .set(&session_doc(&key, &session_id)?, &writes, false)
            .await?;

        let cache = FieldWrites::new().array_union("sessions", vec![Value::from(session_id.as_str())]);
        self.store.set(&user_doc(&key)?, &cache, true).await?;

        info!(user = %key, session_id = %session_id, "Created session");
        Ok(session_id)
    }

    /// Return a session's transcript verbatim.
    ///
    /// Only `user` and `assistant` messages with string content decode; any
    /// other stored shape is a storage error.
    pub async fn get_messages(&self, email: &str, session_id: &str) -> Result<Vec<Message>, RelayError> {
        let key = UserKey::from_email(email)?;
        let session = self
            .load_session(&key, session_id)
            .await?
            .ok_or(RelayError::SessionNotFound)?;
        Ok(session.messages)
    }

    /// Load a session document, `None` if absent.
    ///
    /// A session id that cannot address a document is treated as absent.
    pub async fn load_session(
        &self,
        key: &UserKey,
        session_id: &str,
    ) -> Result<Option<ChatSession>, RelayError> {
        let Some(path) = Self::session_path(key, session_id)? else {
            return Ok(None);
        };

        match self.store.get(&path).await? {
            Some(doc) => {
                let mut session: ChatSession = doc.decode()?;
                session.id = doc.id;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Persist a full transcript after a completed turn.
    ///
    /// Overwrites `messages` wholesale (last write wins) and stamps
    /// `updated_at` and `last_reply`.
    pub async fn save_transcript(
        &self,
        key: &UserKey,
        session_id: &str,
        messages: &[Message],
        last_reply: &str,
    ) -> Result<(), RelayError> {
        let path = Self::session_path(key, session_id)?.ok_or(RelayError::SessionNotFound)?;
        let messages = serde_json::to_value(messages)
            .map_err(|e| RepositoryError::Query(format!("failed to encode transcript: {e}")))?;

        let writes = FieldWrites::new()
            .value("messages", messages)
            .server_timestamp("updated_at")
            .value("last_reply", last_reply);

        match self.store.update(&path, &writes).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(RelayError::SessionNotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn session_path(key: &UserKey, session_id: &str) -> Result<Option<DocumentPath>, RelayError> {
        match session_doc(key, session_id) {
            Ok(path) => Ok(Some(path)),
            Err(RepositoryError::InvalidPath(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryDocumentStore;

    fn sessions() -> SessionStore<InMemoryDocumentStore> {
        SessionStore::new(InMemoryDocumentStore::new())
    }

    #[tokio::test]
    async fn test_first_login_creates_user() {
        let store = sessions();
        let outcome = store.ensure_user("  Ada@Example.com ").await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(outcome.user().email, "Ada@Example.com");
        assert!(outcome.user().sessions.is_empty());
    }

    #[tokio::test]
    async fn test_login_is_idempotent() {
        let store = sessions();
        let first = store.ensure_user("ada@x.com").await.unwrap();
        let second = store.ensure_user("ada@x.com").await.unwrap();

        assert!(first.is_created());
        assert!(!second.is_created());
        assert_eq!(first.user(), second.user());
        assert_eq!(store.store().len(), 1);
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_email() {
        let store = sessions();
        let err = store.ensure_user("no-at-sign").await.unwrap_err();
        assert!(matches!(err, RelayError::InvalidEmail));
        assert!(store.store().is_empty());
    }

    #[tokio::test]
    async fn test_list_sessions_unknown_user_is_empty() {
        let store = sessions();
        assert!(store.list_sessions("ghost@x.com").await.unwrap().is_empty());
        assert!(store.store().is_empty(), "listing must not create the user");
    }

    #[tokio::test]
    async fn test_list_sessions_zero_sessions() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        assert!(store.list_sessions("ada@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_session_requires_user() {
        let store = sessions();
        let err = store.create_session("ghost@x.com").await.unwrap_err();
        assert!(matches!(err, RelayError::UserNotFound));
    }

    #[tokio::test]
    async fn test_created_session_is_listed_and_cached() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        let id = store.create_session("ADA@x.com").await.unwrap();

        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(store.list_sessions("ada@x.com").await.unwrap(), vec![id.clone()]);

        let key = UserKey::from_email("ada@x.com").unwrap();
        let user: UserRecord = store
            .store()
            .get(&user_doc(&key).unwrap())
            .await
            .unwrap()
            .unwrap()
            .decode()
            .unwrap();
        assert_eq!(user.sessions, vec![id]);
        assert_eq!(user.email, "ada@x.com");
    }

    #[tokio::test]
    async fn test_listing_refreshes_stale_cache() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        let key = UserKey::from_email("ada@x.com").unwrap();

        // A session written without touching the cache.
        store
            .store()
            .set(
                &session_doc(&key, "orphan").unwrap(),
                &FieldWrites::new().value("messages", Value::Array(Vec::new())),
                false,
            )
            .await
            .unwrap();

        let ids = store.list_sessions("ada@x.com").await.unwrap();
        assert_eq!(ids, vec!["orphan".to_string()]);

        let doc = store.store().get(&user_doc(&key).unwrap()).await.unwrap().unwrap();
        assert_eq!(doc.fields["sessions"], serde_json::json!(["orphan"]));
        assert_eq!(doc.fields["email"], serde_json::json!("ada@x.com"));
    }

    #[tokio::test]
    async fn test_fresh_session_has_empty_transcript() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        let id = store.create_session("ada@x.com").await.unwrap();

        assert!(store.get_messages("ada@x.com", &id).await.unwrap().is_empty());

        let key = UserKey::from_email("ada@x.com").unwrap();
        let session = store.load_session(&key, &id).await.unwrap().unwrap();
        assert_eq!(session.id, id);
        assert!(session.created_at.is_some());
        assert!(session.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_messages_unknown_session() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();

        for id in ["missing", "", "a/b"] {
            let err = store.get_messages("ada@x.com", id).await.unwrap_err();
            assert!(matches!(err, RelayError::SessionNotFound), "{id:?}");
        }
    }

    #[tokio::test]
    async fn test_foreign_message_shape_is_storage_error() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        let key = UserKey::from_email("ada@x.com").unwrap();

        store
            .store()
            .set(
                &session_doc(&key, "external").unwrap(),
                &FieldWrites::new().value(
                    "messages",
                    serde_json::json!([{"role": "system", "content": "be brief"}]),
                ),
                false,
            )
            .await
            .unwrap();

        let err = store.get_messages("ada@x.com", "external").await.unwrap_err();
        assert!(matches!(err, RelayError::Storage(_)));
    }

    #[tokio::test]
    async fn test_sessions_are_scoped_per_user() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        store.ensure_user("bob@x.com").await.unwrap();
        let id = store.create_session("ada@x.com").await.unwrap();

        let err = store.get_messages("bob@x.com", &id).await.unwrap_err();
        assert!(matches!(err, RelayError::SessionNotFound));
        assert!(store.list_sessions("bob@x.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_transcript_stamps_session() {
        let store = sessions();
        store.ensure_user("ada@x.com").await.unwrap();
        let id = store.create_session("ada@x.com").await.unwrap();
        let key = UserKey::from_email("ada@x.com").unwrap();

        let transcript = vec![Message::user("hi"), Message::assistant("hello")];
        store.save_transcript(&key, &id, &transcript, "hello").await.unwrap();

        let session = store.load_session(&key, &id).await.unwrap().unwrap();
        assert_eq!(session.messages, transcript);
        assert_eq!(session.last_reply.as_deref(), Some("hello"));
        assert!(session.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_save_transcript_missing_session() {
        let store = sessions();
        let key = UserKey::from_email("ada@x.com").unwrap();
        let err = store
            .save_transcript(&key, "missing", &[Message::user("hi")], "x")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::SessionNotFound));
    }
}
