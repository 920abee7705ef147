//! In-memory document collection.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::{DocumentStore, StoreError, StoreResult};
use crate::record::{Record, RecordFields, RecordId};

/// A collection held in a `BTreeMap`, listed in id order.
///
/// Clones share the same underlying collection.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    collection: Arc<str>,
    documents: Arc<RwLock<BTreeMap<RecordId, RecordFields>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("vehicles")
    }
}

impl InMemoryStore {
    /// Create an empty collection.
    #[must_use]
    pub fn new(collection: &str) -> Self {
        Self {
            collection: Arc::from(collection),
            documents: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a collection pre-populated with `records`.
    #[must_use]
    pub fn with_records(collection: &str, records: impl IntoIterator<Item = Record>) -> Self {
        let documents = records.into_iter().map(|r| (r.id, r.fields)).collect();
        Self {
            collection: Arc::from(collection),
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    /// The collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn poisoned<T>(_: T) -> StoreError {
        StoreError::backend("lock poisoned")
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryStore {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        let documents = self.documents.read().map_err(Self::poisoned)?;
        Ok(documents
            .iter()
            .map(|(id, fields)| Record::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn create(&self, fields: &RecordFields) -> StoreResult<RecordId> {
        let id = RecordId::generate(&self.collection);
        self.documents
            .write()
            .map_err(Self::poisoned)?
            .insert(id.clone(), fields.clone());
        debug!("Created document {} in {}", id, self.collection);
        Ok(id)
    }

    async fn update(&self, id: &RecordId, fields: &RecordFields) -> StoreResult<()> {
        let mut documents = self.documents.write().map_err(Self::poisoned)?;
        match documents.get_mut(id) {
            Some(existing) => {
                *existing = fields.clone();
                Ok(())
            }
            None => Err(StoreError::not_found(id)),
        }
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        let mut documents = self.documents.write().map_err(Self::poisoned)?;
        documents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(plate: &str) -> RecordFields {
        RecordFields {
            plate: plate.to_string(),
            brand: "Honda".to_string(),
            color: "Black".to_string(),
            model: "Civic".to_string(),
            engine: "1.5L".to_string(),
            year: "2021".to_string(),
            price: 21000.0,
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let store = InMemoryStore::default();
        let id = store.create(&fields("AAA111")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].fields, fields("AAA111"));
    }

    #[tokio::test]
    async fn test_update_existing() {
        let store = InMemoryStore::default();
        let id = store.create(&fields("AAA111")).await.unwrap();

        store.update(&id, &fields("BBB222")).await.unwrap();
        assert_eq!(store.list().await.unwrap()[0].fields.plate, "BBB222");
    }

    #[tokio::test]
    async fn test_update_missing() {
        let store = InMemoryStore::default();
        let err = store
            .update(&RecordId::new("ghost"), &fields("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryStore::default();
        let id = store.create(&fields("AAA111")).await.unwrap();

        store.delete(&id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let err = store.delete(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_collection() {
        let store = InMemoryStore::new("fleet");
        let other = store.clone();
        store.create(&fields("AAA111")).await.unwrap();

        assert_eq!(other.list().await.unwrap().len(), 1);
        assert_eq!(other.collection(), "fleet");
    }

    #[tokio::test]
    async fn test_with_records() {
        let seeded = Record::new(RecordId::new("seed"), fields("SEED01"));
        let store = InMemoryStore::with_records("vehicles", vec![seeded.clone()]);
        assert_eq!(store.list().await.unwrap(), vec![seeded]);
    }
}
