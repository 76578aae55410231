//! In-memory [`DocumentStore`] backed by a `DashMap`.
//!
//! Each write holds the shard lock for its document while the field writes
//! are resolved, so single-document writes are atomic. Nothing is persisted.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;

use parley_types::document::{CollectionPath, Document, DocumentPath, FieldWrites, Fields};
use parley_types::error::RepositoryError;

use super::document::DocumentStore;

type DocKey = (String, String);

/// Process-local document store. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    docs: Arc<DashMap<DocKey, Fields>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    fn key(path: &DocumentPath) -> DocKey {
        (path.parent().as_str().to_string(), path.id().to_string())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, RepositoryError> {
        Ok(self.docs.get(&Self::key(path)).map(|fields| Document {
            id: path.id().to_string(),
            fields: fields.clone(),
        }))
    }

    async fn set(
        &self,
        path: &DocumentPath,
        writes: &FieldWrites,
        merge: bool,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();
        if merge {
            let mut entry = self.docs.entry(Self::key(path)).or_default();
            writes.apply(entry.value_mut(), now);
        } else {
            let mut fields = Fields::new();
            writes.apply(&mut fields, now);
            self.docs.insert(Self::key(path), fields);
        }
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, writes: &FieldWrites) -> Result<(), RepositoryError> {
        let mut fields = self
            .docs
            .get_mut(&Self::key(path))
            .ok_or(RepositoryError::NotFound)?;
        writes.apply(fields.value_mut(), Utc::now());
        Ok(())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<String>, RepositoryError> {
        let mut ids: Vec<String> = self
            .docs
            .iter()
            .filter(|entry| entry.key().0 == collection.as_str())
            .map(|entry| entry.key().1.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> CollectionPath {
        CollectionPath::root("users").unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = InMemoryDocumentStore::new();
        let path = users().doc("nobody").unwrap();
        assert!(store.get(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_replace_drops_old_fields() {
        let store = InMemoryDocumentStore::new();
        let path = users().doc("ada").unwrap();

        store
            .set(&path, &FieldWrites::new().value("a", 1).value("b", 2), false)
            .await
            .unwrap();
        store
            .set(&path, &FieldWrites::new().value("a", 3), false)
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("a"), Some(&json!(3)));
        assert!(doc.fields.get("b").is_none());
    }

    #[tokio::test]
    async fn test_set_merge_keeps_other_fields() {
        let store = InMemoryDocumentStore::new();
        let path = users().doc("ada").unwrap();

        store
            .set(&path, &FieldWrites::new().value("email", "ada@x.com"), false)
            .await
            .unwrap();
        store
            .set(&path, &FieldWrites::new().value("sessions", json!(["s1"])), true)
            .await
            .unwrap();

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields["email"], json!("ada@x.com"));
        assert_eq!(doc.fields["sessions"], json!(["s1"]));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let path = users().doc("ghost").unwrap();
        let result = store.update(&path, &FieldWrites::new().value("x", 1)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_list_only_direct_children() {
        let store = InMemoryDocumentStore::new();
        let ada = users().doc("ada").unwrap();
        let sessions = ada.collection("sessions").unwrap();

        store.set(&ada, &FieldWrites::new(), false).await.unwrap();
        for id in ["b", "a"] {
            store
                .set(&sessions.doc(id).unwrap(), &FieldWrites::new(), false)
                .await
                .unwrap();
        }

        assert_eq!(store.list(&sessions).await.unwrap(), vec!["a", "b"]);
        assert_eq!(store.list(&users()).await.unwrap(), vec!["ada"]);
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_array_unions_keep_every_id() {
        let store = InMemoryDocumentStore::new();
        let path = users().doc("ada").unwrap();

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            let path = path.clone();
            handles.push(tokio::spawn(async move {
                let writes = FieldWrites::new().array_union("sessions", vec![json!(format!("s{i}"))]);
                store.set(&path, &writes, true).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let doc = store.get(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields["sessions"].as_array().unwrap().len(), 32);
    }
}
