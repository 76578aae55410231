//! Document store abstractions.
//!
//! - `DocumentStore`: RPITIT trait implemented by the infra adapters
//! - `InMemoryDocumentStore`: process-local implementation backed by a `DashMap`

pub mod document;
pub mod memory;
