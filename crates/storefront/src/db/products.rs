//! Product repository.

use std::cmp::Ordering;

use bbs_core::{NewProduct, Product, ProductId};
use tracing::instrument;

use super::{DocumentStore, RepositoryError, collections, decode, decode_all, encode};

/// Repository for catalog products.
pub struct ProductRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All products, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    /// Returns `RepositoryError::DataCorruption` if a document does not decode.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let docs = self.store.list(collections::PRODUCTS).await?;
        decode_all(collections::PRODUCTS, docs)
    }

    /// One product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        self.store
            .get(collections::PRODUCTS, id.as_str())
            .await?
            .map(|doc| decode(collections::PRODUCTS, doc))
            .transpose()
    }

    /// Products for a set of ids, in the order the ids were given.
    ///
    /// Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let keys: Vec<String> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        let docs = self.store.get_many(collections::PRODUCTS, &keys).await?;
        let mut products: Vec<Product> = decode_all(collections::PRODUCTS, docs)?;
        products.sort_by_key(|p| ids.iter().position(|id| *id == p.id));
        Ok(products)
    }

    /// Up to `limit` products flagged as featured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn featured(&self, limit: usize) -> Result<Vec<Product>, RepositoryError> {
        let docs = self
            .store
            .filter_eq(collections::PRODUCTS, "featured", &serde_json::Value::Bool(true))
            .await?;
        let mut products: Vec<Product> = decode_all(collections::PRODUCTS, docs)?;
        products.truncate(limit);
        Ok(products)
    }

    /// Up to `limit` products with the highest rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    #[instrument(skip(self))]
    pub async fn top_rated(&self, limit: usize) -> Result<Vec<Product>, RepositoryError> {
        let mut products = self.list().await?;
        products.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        products.truncate(limit);
        Ok(products)
    }

    /// Create a product under a generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let doc = encode(collections::PRODUCTS, &product)?;
        let id = self.store.insert(collections::PRODUCTS, doc).await?;
        Ok(product.with_id(ProductId::new(id)))
    }

    /// Create or replace a product under its own id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn put(&self, product: &Product) -> Result<(), RepositoryError> {
        let doc = encode(collections::PRODUCTS, product)?;
        self.store
            .put(collections::PRODUCTS, product.id.as_str(), doc)
            .await?;
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        if self.store.delete(collections::PRODUCTS, id.as_str()).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::MemoryDocumentStore;

    async fn seeded() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        for (id, rating, featured) in [
            ("prod1", 4.8, true),
            ("prod2", 4.9, true),
            ("prod3", 4.7, false),
            ("prod4", 4.2, false),
        ] {
            store
                .put(
                    collections::PRODUCTS,
                    id,
                    json!({
                        "name": id,
                        "price": "10.00",
                        "category": "audio",
                        "rating": rating,
                        "featured": featured
                    }),
                )
                .await
                .unwrap();
        }
        store
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_featured_and_top_rated() {
        let store = seeded().await;
        let repo = ProductRepository::new(&store);

        assert_eq!(ids(&repo.featured(4).await.unwrap()), vec!["prod1", "prod2"]);
        assert_eq!(ids(&repo.featured(1).await.unwrap()), vec!["prod1"]);
        assert_eq!(
            ids(&repo.top_rated(3).await.unwrap()),
            vec!["prod2", "prod1", "prod3"]
        );
    }

    #[tokio::test]
    async fn test_get_by_ids_keeps_request_order() {
        let store = seeded().await;
        let repo = ProductRepository::new(&store);

        let products = repo
            .get_by_ids(&[
                ProductId::new("prod3"),
                ProductId::new("missing"),
                ProductId::new("prod1"),
            ])
            .await
            .unwrap();
        assert_eq!(ids(&products), vec!["prod3", "prod1"]);
    }

    #[tokio::test]
    async fn test_create_then_delete() {
        let store = MemoryDocumentStore::new();
        let repo = ProductRepository::new(&store);

        let created = repo
            .create(NewProduct::draft("Studio Monitor", "Flat.", "speaker"))
            .await
            .unwrap();
        let fetched = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.get(&created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let store = MemoryDocumentStore::new();
        store
            .put(collections::PRODUCTS, "bad", json!({ "name": 42 }))
            .await
            .unwrap();
        let repo = ProductRepository::new(&store);

        assert!(matches!(
            repo.list().await,
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
