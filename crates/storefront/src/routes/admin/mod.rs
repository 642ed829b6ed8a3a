//! Admin console.
//!
//! Every handler takes the [`RequireAdmin`](crate::middleware::RequireAdmin)
//! extractor, so anonymous and non-admin visitors are sent back to `/`
//! before any admin data is read.

pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use bbs_core::User;

use crate::state::AppState;

/// Signed-in admin shown in the console header.
#[derive(Clone)]
pub struct AdminView {
    pub first_name: String,
    pub initial: String,
}

impl From<&User> for AdminView {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            initial: user.initials(),
        }
    }
}

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/products", get(products::index).post(products::create))
        .route("/products/generate", post(products::generate))
        .route("/products/{id}/delete", post(products::delete))
        .route("/orders", get(orders::index))
        .route("/users", get(users::index))
}
