//! In-process document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::store::{DocumentStore, StoreError, generate_id, with_id};

type Collection = BTreeMap<String, Value>;

/// A [`DocumentStore`] held in memory.
///
/// Collections are ordered maps keyed by id, so listings come back in byte
/// order like the `PostgreSQL` backend's `COLLATE "C"` sort. Nothing is
/// persisted.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn get_many(&self, collection: &str, ids: &[String]) -> Result<Vec<Value>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn filter_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let id = generate_id();
        let doc = with_id(collection, doc, &id)?;
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let doc = with_id(collection, doc, id)?;
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .insert(id.to_owned(), doc);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
