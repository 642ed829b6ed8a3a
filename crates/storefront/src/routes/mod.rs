//! HTTP route handlers for the storefront and admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (pings the document store)
//! GET  /images/{id}            - Placeholder artwork for an image id
//!
//! # Products
//! GET  /products               - Listing (?q=&category=&brand=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (form posts, redirect back)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add product x quantity
//! POST /cart/update            - Set line quantity (<= 0 removes)
//! POST /cart/remove            - Remove line
//! POST /checkout               - Place an order (requires auth)
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! GET  /signup                 - Sign-up page
//! POST /signup                 - Sign-up action
//! POST /logout                 - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Profile, orders, favorites, recommendations
//! POST /account/favorites/{id} - Toggle a favorite
//!
//! # Pages
//! GET  /about                  - About page
//! GET  /contact                - Contact page
//! POST /contact                - Contact form (logged, toast)
//!
//! # Admin (requires an admin profile)
//! GET  /admin                  - Dashboard
//! GET  /admin/products         - Product table + add form
//! POST /admin/products         - Create product
//! POST /admin/products/generate      - Generate a description
//! POST /admin/products/{id}/delete   - Delete product
//! GET  /admin/orders           - Orders table
//! GET  /admin/users            - Customers table
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod images;
pub mod pages;
pub mod products;

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/favorites/{id}", post(account::toggle_favorite))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/images/{id}", get(images::show))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .nest("/account", account_routes())
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact).post(pages::send_message))
        .nest("/admin", admin::routes())
        .fallback(pages::not_found)
}

/// Build the application with its middleware stack.
///
/// The session store is a parameter so tests can run on
/// `tower_sessions::MemoryStore`. The Sentry layers are added by the binary.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
