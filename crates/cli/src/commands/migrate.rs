//! Database migration command.
//!
//! ```bash
//! bbs-cli migrate
//! ```
//!
//! Runs the storefront migrations in `crates/storefront/migrations/` (the
//! `documents` table) and then creates the session table used by
//! `tower-sessions-sqlx-store`. Both steps are idempotent.

use bbs_storefront::db;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or session table error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run every migration.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = super::database_url().map_err(MigrationError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
