//! Error types for fleetbook.
//!
//! This module defines the crate-wide error type. Store and validation
//! failures keep their own enums in [`crate::store`] and [`crate::validate`]
//! and convert into [`Error`] when they cross the controller boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::record::RecordId;
use crate::store::StoreError;
use crate::validate::ValidationError;

/// The main error type for fleetbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Form Errors ===
    /// The draft failed validation; nothing was sent to the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A store call failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A submit was attempted while another was still outstanding.
    #[error("a submit is already in flight")]
    SubmitInFlight,

    /// The requested record is not in the cached listing.
    #[error("record {id} is not in the current listing")]
    RecordNotCached {
        /// The id that was asked for.
        id: RecordId,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed outside a store call.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fleetbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a record-not-cached error.
    #[must_use]
    pub fn record_not_cached(id: &RecordId) -> Self {
        Self::RecordNotCached { id: id.clone() }
    }

    /// Check if this error is a rejected draft.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error is a store call that failed.
    #[must_use]
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Check if the store reported the document as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }
}
