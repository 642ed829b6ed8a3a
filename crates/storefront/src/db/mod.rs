//! Document store and typed repositories.
//!
//! # Collections
//!
//! Every record lives as a JSON document in a named collection:
//!
//! - `products` - Catalog
//! - `categories` - Category tiles
//! - `orders` - Customer orders
//! - `users` - Customer profiles
//! - `credentials` - Password hashes, keyed by user id
//!
//! # Backends
//!
//! - [`PgDocumentStore`] - `documents` table in `PostgreSQL`
//! - [`MemoryDocumentStore`] - ordered in-process maps, for tests and local runs
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p bbs-cli -- migrate
//! ```

pub mod categories;
pub mod credentials;
pub mod memory;
pub mod orders;
pub mod postgres;
pub mod products;
pub mod seed;
pub mod store;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use categories::CategoryRepository;
pub use credentials::{Credential, CredentialRepository};
pub use memory::MemoryDocumentStore;
pub use orders::OrderRepository;
pub use postgres::PgDocumentStore;
pub use products::ProductRepository;
pub use seed::{SeedCatalog, SeedSummary};
pub use store::{DocumentStore, StoreError};
pub use users::UserRepository;

/// Collection names.
pub mod collections {
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";
    pub const ORDERS: &str = "orders";
    pub const USERS: &str = "users";
    pub const CREDENTIALS: &str = "credentials";
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Store backend error.
    #[error("database error: {0}")]
    Database(#[from] StoreError),

    /// A stored document does not match the expected record shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Decode a stored document into a record.
pub(crate) fn decode<T: DeserializeOwned>(
    collection: &str,
    doc: Value,
) -> Result<T, RepositoryError> {
    let id = doc
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<missing id>")
        .to_owned();
    serde_json::from_value(doc).map_err(|e| {
        RepositoryError::DataCorruption(format!("{collection}/{id} does not decode: {e}"))
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    collection: &str,
    docs: Vec<Value>,
) -> Result<Vec<T>, RepositoryError> {
    docs.into_iter().map(|doc| decode(collection, doc)).collect()
}

/// Encode a record as a document.
pub(crate) fn encode<T: Serialize>(collection: &str, record: &T) -> Result<Value, RepositoryError> {
    serde_json::to_value(record).map_err(|e| {
        RepositoryError::DataCorruption(format!("{collection} record does not encode: {e}"))
    })
}
