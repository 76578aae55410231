//! SQLite document store implementation.
//!
//! Implements `DocumentStore` from `parley-core`. Each document is one row in
//! `documents`, keyed by (collection path, id), with its fields stored as a
//! JSON object. Read-modify-write operations run in a transaction on the
//! single-connection writer pool, so writes to one document never interleave.

use chrono::Utc;
use sqlx::Row;

use parley_core::store::document::DocumentStore;
use parley_types::document::{CollectionPath, Document, DocumentPath, FieldWrites, Fields};
use parley_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `DocumentStore`.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: DatabasePool,
}

impl SqliteDocumentStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

fn decode_fields(data: &str) -> Result<Fields, RepositoryError> {
    serde_json::from_str(data).map_err(|e| RepositoryError::Query(format!("invalid document data: {e}")))
}

fn encode_fields(fields: &Fields) -> Result<String, RepositoryError> {
    serde_json::to_string(fields).map_err(|e| RepositoryError::Query(format!("failed to encode document: {e}")))
}

impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, RepositoryError> {
        let row = sqlx::query("SELECT data FROM documents WHERE collection = ? AND id = ?")
            .bind(path.parent().as_str())
            .bind(path.id())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let data: String = row.try_get("data").map_err(query_err)?;
                Ok(Some(Document {
                    id: path.id().to_string(),
                    fields: decode_fields(&data)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        path: &DocumentPath,
        writes: &FieldWrites,
        merge: bool,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let mut fields = if merge {
            let existing: Option<(String,)> =
                sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                    .bind(path.parent().as_str())
                    .bind(path.id())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(query_err)?;
            match existing {
                Some((data,)) => decode_fields(&data)?,
                None => Fields::new(),
            }
        } else {
            Fields::new()
        };
        writes.apply(&mut fields, now);

        let stamp = now.to_rfc3339();
        sqlx::query(
            r#"INSERT INTO documents (collection, id, data, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (collection, id)
               DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at"#,
        )
        .bind(path.parent().as_str())
        .bind(path.id())
        .bind(encode_fields(&fields)?)
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, writes: &FieldWrites) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT data FROM documents WHERE collection = ? AND id = ?")
                .bind(path.parent().as_str())
                .bind(path.id())
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_err)?;
        let (data,) = existing.ok_or(RepositoryError::NotFound)?;

        let mut fields = decode_fields(&data)?;
        writes.apply(&mut fields, now);

        sqlx::query("UPDATE documents SET data = ?, updated_at = ? WHERE collection = ? AND id = ?")
            .bind(encode_fields(&fields)?)
            .bind(now.to_rfc3339())
            .bind(path.parent().as_str())
            .bind(path.id())
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM documents WHERE collection = ? ORDER BY id")
                .bind(collection.as_str())
                .fetch_all(&self.pool.reader)
                .await
                .map_err(query_err)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
