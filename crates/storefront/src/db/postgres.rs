//! `PostgreSQL` document store.
//!
//! All collections share one table:
//!
//! ```sql
//! CREATE TABLE documents (
//!     collection TEXT NOT NULL,
//!     id TEXT NOT NULL,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     PRIMARY KEY (collection, id)
//! );
//! ```
//!
//! Queries are checked at runtime; documents carry no schema. Listings sort
//! ids with `COLLATE "C"` so they come back in byte order regardless of
//! the database locale.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use super::store::{DocumentStore, StoreError, generate_id, with_id};

const LIST_SQL: &str =
    r#"SELECT data FROM documents WHERE collection = $1 ORDER BY id COLLATE "C""#;

const GET_MANY_SQL: &str = r#"SELECT data FROM documents WHERE collection = $1 AND id = ANY($2) ORDER BY id COLLATE "C""#;

const FILTER_EQ_SQL: &str = r#"SELECT data FROM documents WHERE collection = $1 AND data -> $2 = $3 ORDER BY id COLLATE "C""#;

/// A [`DocumentStore`] backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let docs = sqlx::query_scalar::<_, Value>(LIST_SQL)
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;
        Ok(docs)
    }

    #[instrument(skip(self))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let doc = sqlx::query_scalar::<_, Value>(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, collection: &str, ids: &[String]) -> Result<Vec<Value>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let docs = sqlx::query_scalar::<_, Value>(GET_MANY_SQL)
            .bind(collection)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(docs)
    }

    #[instrument(skip(self, value))]
    async fn filter_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        let docs = sqlx::query_scalar::<_, Value>(FILTER_EQ_SQL)
            .bind(collection)
            .bind(field)
            .bind(Json(value))
            .fetch_all(&self.pool)
            .await?;
        Ok(docs)
    }

    #[instrument(skip(self, doc))]
    async fn insert(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let id = generate_id();
        let doc = with_id(collection, doc, &id)?;
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    #[instrument(skip(self, doc))]
    async fn put(&self, collection: &str, id: &str, doc: Value) -> Result<(), StoreError> {
        let doc = with_id(collection, doc, id)?;
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&doc))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listings_sort_ids_bytewise() {
        for sql in [LIST_SQL, GET_MANY_SQL, FILTER_EQ_SQL] {
            assert!(sql.ends_with(r#"ORDER BY id COLLATE "C""#), "{sql}");
        }
    }
}
