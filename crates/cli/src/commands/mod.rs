//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Environment variable holding the database connection string.
pub const DATABASE_URL_VAR: &str = "BBS_DATABASE_URL";

/// Read the database URL, loading `.env` first.
///
/// # Errors
///
/// Returns the variable name if it is not set.
pub fn database_url() -> Result<SecretString, &'static str> {
    dotenvy::dotenv().ok();
    std::env::var(DATABASE_URL_VAR)
        .map(SecretString::from)
        .map_err(|_| DATABASE_URL_VAR)
}
