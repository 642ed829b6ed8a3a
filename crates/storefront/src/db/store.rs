//! The document store abstraction.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// The document is not a JSON object and cannot carry an `id`.
    #[error("document in {collection} is not a JSON object")]
    NotAnObject {
        /// Collection the write targeted.
        collection: String,
    },
}

/// Direct CRUD over named collections of JSON documents.
///
/// Every document carries its key in a top-level `id` field. There are no
/// transactions and no concurrency control; the last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// One document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Documents whose id is in `ids`, ordered by id. Missing ids are
    /// skipped.
    async fn get_many(&self, collection: &str, ids: &[String]) -> Result<Vec<Value>, StoreError>;

    /// Documents whose top-level `field` equals `value`, ordered by id.
    async fn filter_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError>;

    /// Create a document under a generated id and return the id.
    ///
    /// The id is written into the stored document's `id` field.
    async fn insert(&self, collection: &str, doc: Value) -> Result<String, StoreError>;

    /// Create or replace the document with this id.
    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError>;

    /// Remove a document. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// A fresh document id.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Write `id` into the document's `id` field.
pub(crate) fn with_id(collection: &str, mut doc: Value, id: &str) -> Result<Value, StoreError> {
    let object = doc.as_object_mut().ok_or_else(|| StoreError::NotAnObject {
        collection: collection.to_owned(),
    })?;
    object.insert("id".to_owned(), Value::String(id.to_owned()));
    Ok(doc)
}
