//! DocumentStore trait definition.
//!
//! Models the primitives of a hierarchical document database: get,
//! set (replace or merge), update, and collection listing. Field writes may
//! carry store-resolved values (`ServerTimestamp`, `ArrayUnion`), which the
//! implementation resolves atomically per document.

use parley_types::document::{CollectionPath, Document, DocumentPath, FieldWrites};
use parley_types::error::RepositoryError;

/// Repository trait for document persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteDocumentStore`) and in
/// [`super::memory`]. Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` if it does not exist.
    fn get(
        &self,
        path: &DocumentPath,
    ) -> impl std::future::Future<Output = Result<Option<Document>, RepositoryError>> + Send;

    /// Write a document, creating it if absent.
    ///
    /// With `merge = false` the document is replaced by the result of applying
    /// `writes` to an empty object. With `merge = true` the writes are applied
    /// on top of the existing fields.
    fn set(
        &self,
        path: &DocumentPath,
        writes: &FieldWrites,
        merge: bool,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Apply writes to an existing document.
    ///
    /// Fails with `RepositoryError::NotFound` if the document does not exist.
    fn update(
        &self,
        path: &DocumentPath,
        writes: &FieldWrites,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Ids of the documents directly inside `collection`, ordered by id.
    fn list(
        &self,
        collection: &CollectionPath,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
