//! Record list cache.
//!
//! Holds the last snapshot read from the store. The store stays the source of
//! truth; the cache is replaced on refresh or patched after a mutation.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::record::{Record, RecordFields, RecordId};

/// The most recently observed contents of the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCache {
    records: Vec<Record>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl RecordCache {
    /// An empty cache that has never been refreshed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached records, in store order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Look up a cached record.
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Number of cached records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the cache was last replaced from the store.
    #[must_use]
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Replace the snapshot with a fresh listing.
    pub fn replace(&mut self, records: Vec<Record>) {
        debug!("Record cache refreshed with {} records", records.len());
        self.records = records;
        self.refreshed_at = Some(Utc::now());
    }

    /// Record a document the store just created.
    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Overwrite a cached record's fields.
    ///
    /// Returns `false` if the id is not cached.
    pub fn update(&mut self, id: &RecordId, fields: RecordFields) -> bool {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(record) => {
                record.fields = fields;
                true
            }
            None => false,
        }
    }

    /// Drop a record from the snapshot.
    ///
    /// Returns `false` if the id is not cached.
    pub fn remove(&mut self, id: &RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        self.records.len() != before
    }
}
