//! Admin flag management.
//!
//! ```bash
//! bbs-cli admin grant --email alice@example.com
//! bbs-cli admin revoke --email alice@example.com
//! ```
//!
//! The admin console re-reads the profile on every request, so a change
//! applies to the customer's next page load without signing out.

use bbs_core::{Email, EmailError};
use bbs_storefront::db::{self, PgDocumentStore, RepositoryError, UserRepository};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Store or decoding error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No profile has this email.
    #[error("No customer profile with email: {0}")]
    UserNotFound(String),
}

/// Set or clear the admin flag on the profile with this email.
///
/// # Errors
///
/// Returns an error if the email is malformed, no profile matches, or the
/// store fails.
pub async fn set_admin(email: &str, is_admin: bool) -> Result<(), AdminError> {
    let email = Email::parse(email)?;
    let database_url = super::database_url().map_err(AdminError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let store = PgDocumentStore::new(pool);
    let users = UserRepository::new(&store);

    let mut user = users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AdminError::UserNotFound(email.to_string()))?;

    if user.is_admin == is_admin {
        tracing::info!(user_id = %user.id, is_admin, "Admin flag already set, nothing to do");
        return Ok(());
    }

    user.is_admin = is_admin;
    users.put(&user).await?;

    if is_admin {
        tracing::info!(user_id = %user.id, email = %email, "Admin access granted");
    } else {
        tracing::info!(user_id = %user.id, email = %email, "Admin access revoked");
    }

    Ok(())
}
