//! Cookie sessions.
//!
//! The cart, the signed-in identity and pending toasts are all session
//! data. Production keeps sessions in `PostgreSQL`; the table comes from
//! `bbs-cli migrate`.

use sqlx::PgPool;
use tower_sessions::cookie::{SameSite, time::Duration};
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

pub const SESSION_COOKIE_NAME: &str = "bbs_session";

/// A week of inactivity ends the session, cart included.
const IDLE_TIMEOUT: Duration = Duration::days(7);

/// Session layer backed by the storefront database.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> SessionManagerLayer<PostgresStore> {
    session_layer(PostgresStore::new(pool.clone()), config.is_secure())
}

/// Storefront cookie settings over any store, e.g. `MemoryStore` in tests.
#[must_use]
pub fn session_layer<S: SessionStore + Clone>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(secure)
        .with_expiry(Expiry::OnInactivity(IDLE_TIMEOUT))
}
