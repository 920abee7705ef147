//! Document store clients.
//!
//! The controller talks to a collection of vehicle documents through the
//! [`DocumentStore`] trait. Two backends are provided: [`SqliteStore`], a
//! `SQLite`-backed collection used by the binary, and [`InMemoryStore`] for
//! tests and embedding.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use thiserror::Error;

use crate::record::{Record, RecordFields, RecordId};

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Errors returned by store calls.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this id exists in the collection.
    #[error("document {id} not found")]
    NotFound {
        /// The missing id.
        id: RecordId,
    },

    /// The database rejected a statement.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A document body could not be encoded or decoded.
    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a not-found error for `id`.
    #[must_use]
    pub fn not_found(id: &RecordId) -> Self {
        Self::NotFound { id: id.clone() }
    }

    /// Create a backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A collection-scoped CRUD client.
///
/// Every call is asynchronous and may fail. Implementors decide the listing
/// order; callers must not rely on it being stable.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return every document currently in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    async fn list(&self) -> StoreResult<Vec<Record>>;

    /// Insert a new document and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    async fn create(&self, fields: &RecordFields) -> StoreResult<RecordId>;

    /// Overwrite every field of an existing document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no document has this id.
    async fn update(&self, id: &RecordId, fields: &RecordFields) -> StoreResult<()>;

    /// Remove a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no document has this id.
    async fn delete(&self, id: &RecordId) -> StoreResult<()>;
}
