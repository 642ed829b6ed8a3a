//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, etc.)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Extractors in [`auth`] and [`page`] read the session the layer attaches.

pub mod auth;
pub mod page;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth, set_current_user};
pub use page::{Nav, PageContext};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, session_layer};
