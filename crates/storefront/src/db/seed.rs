//! Catalog seeding from a YAML file.
//!
//! ```yaml
//! categories:
//!   - { id: cameras, name: Cameras, image: cat-cam, productCount: 2 }
//! products:
//!   - id: prod1
//!     name: RetroShot Pro Camera
//!     price: "799.99"
//!     category: cameras
//! users: []
//! orders: []
//! ```
//!
//! Records are written with `put`, so re-running a seed overwrites the
//! seeded documents and leaves everything else alone. Users are seeded as
//! profiles only; they have no credentials until they sign up.

use bbs_core::{Category, Order, Product, User};
use serde::Deserialize;

use super::{
    CategoryRepository, DocumentStore, OrderRepository, ProductRepository, RepositoryError,
    UserRepository,
};

/// Parsed seed file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedCatalog {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub orders: Vec<Order>,
}

/// What a seed run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
    pub users: usize,
    pub orders: usize,
}

impl SeedCatalog {
    /// Parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not match the record shapes.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Problems that would leave the catalog inconsistent.
    ///
    /// Products pointing at an unknown category and orders pointing at an
    /// unknown user are reported; an empty list means the seed is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for product in &self.products {
            if !self.categories.iter().any(|c| c.id == product.category) {
                errors.push(format!(
                    "product {} references unknown category {}",
                    product.id, product.category
                ));
            }
        }

        for order in &self.orders {
            if let Some(user_id) = &order.user_id
                && !self.users.iter().any(|u| &u.id == user_id)
            {
                errors.push(format!("order {} references unknown user {user_id}", order.id));
            }
        }

        errors
    }

    /// Write every record to the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails. Records
    /// written before the failure stay written.
    pub async fn apply(&self, store: &dyn DocumentStore) -> Result<SeedSummary, RepositoryError> {
        let categories = CategoryRepository::new(store);
        for category in &self.categories {
            categories.put(category).await?;
        }

        let products = ProductRepository::new(store);
        for product in &self.products {
            products.put(product).await?;
        }

        let users = UserRepository::new(store);
        for user in &self.users {
            users.put(user).await?;
        }

        let orders = OrderRepository::new(store);
        for order in &self.orders {
            orders.put(order).await?;
        }

        Ok(SeedSummary {
            categories: self.categories.len(),
            products: self.products.len(),
            users: self.users.len(),
            orders: self.orders.len(),
        })
    }
}
