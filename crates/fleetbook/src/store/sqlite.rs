//! `SQLite`-backed document collection.
//!
//! Each document is a row in the shared `documents` table whose body is the
//! JSON encoding of [`RecordFields`]. The connection is synchronous, so every
//! call runs on the blocking pool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use super::migrations;
use super::{DocumentStore, StoreError, StoreResult};
use crate::error::{Error, Result};
use crate::record::{Record, RecordFields, RecordId};

/// A document collection stored in a `SQLite` database.
///
/// Clones share the same connection.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Name of the collection this client is scoped to.
    collection: Arc<str>,
    /// Database connection.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a database at `path`, scoped to `collection`.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!(
            "Document store opened at {} (collection {})",
            path.display(),
            collection
        );
        Ok(Self {
            path,
            collection: Arc::from(collection),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory(collection: &str) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            collection: Arc::from(collection),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The collection this client reads and writes.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Count the documents in the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self) -> StoreResult<u64> {
        self.with_conn(|conn, collection| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                [collection],
                |row| row.get(0),
            )?;
            Ok(u64::try_from(count).unwrap_or_default())
        })
        .await
    }

    /// Run `op` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let collection = Arc::clone(&self.collection);

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::backend("connection lock poisoned"))?;
            op(&conn, &collection)
        })
        .await
        .map_err(|e| StoreError::backend(format!("store task failed: {e}")))?
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[async_trait::async_trait]
impl DocumentStore for SqliteStore {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        self.with_conn(|conn, collection| {
            let mut stmt = conn.prepare(
                r"
                SELECT id, body FROM documents
                WHERE collection = ?1
                ORDER BY created_at ASC, rowid ASC
                ",
            )?;

            let rows = stmt
                .query_map([collection], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(id, body)| -> StoreResult<Record> {
                    let fields: RecordFields = serde_json::from_str(&body)?;
                    Ok(Record::new(RecordId::new(id), fields))
                })
                .collect()
        })
        .await
    }

    async fn create(&self, fields: &RecordFields) -> StoreResult<RecordId> {
        let body = serde_json::to_string(fields)?;

        let id = self
            .with_conn(move |conn, collection| {
                let id = RecordId::generate(collection);
                conn.execute(
                    r"
                    INSERT INTO documents (collection, id, body, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?4)
                    ",
                    params![collection, id.as_str(), body, now()],
                )?;
                Ok(id)
            })
            .await?;

        debug!("Inserted document {} into {}", id, self.collection);
        Ok(id)
    }

    async fn update(&self, id: &RecordId, fields: &RecordFields) -> StoreResult<()> {
        let body = serde_json::to_string(fields)?;
        let target = id.clone();

        let affected = self
            .with_conn(move |conn, collection| {
                Ok(conn.execute(
                    r"
                    UPDATE documents SET body = ?1, updated_at = ?2
                    WHERE collection = ?3 AND id = ?4
                    ",
                    params![body, now(), collection, target.as_str()],
                )?)
            })
            .await?;

        if affected == 0 {
            return Err(StoreError::not_found(id));
        }
        debug!("Updated document {} in {}", id, self.collection);
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        let target = id.clone();

        let affected = self
            .with_conn(move |conn, collection| {
                Ok(conn.execute(
                    "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                    params![collection, target.as_str()],
                )?)
            })
            .await?;

        if affected == 0 {
            return Err(StoreError::not_found(id));
        }
        debug!("Deleted document {} from {}", id, self.collection);
        Ok(())
    }
}
