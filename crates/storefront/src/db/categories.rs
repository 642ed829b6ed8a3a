//! Category repository.

use bbs_core::Category;

use super::{DocumentStore, RepositoryError, collections, decode_all, encode};

/// Repository for category tiles.
pub struct CategoryRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All categories, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let docs = self.store.list(collections::CATEGORIES).await?;
        decode_all(collections::CATEGORIES, docs)
    }

    /// Create or replace a category under its own id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn put(&self, category: &Category) -> Result<(), RepositoryError> {
        let doc = encode(collections::CATEGORIES, category)?;
        self.store
            .put(collections::CATEGORIES, category.id.as_str(), doc)
            .await?;
        Ok(())
    }
}
