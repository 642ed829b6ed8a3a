//! Admin orders table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::AdminView;
use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::{PageContext, RequireAdmin};
use crate::state::AppState;
use crate::views::OrderRow;

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub admin: AdminView,
    pub orders: Vec<OrderRow>,
}

/// List every order, newest first.
///
/// # Errors
///
/// Returns an error if the orders cannot be read.
#[instrument(skip(state, ctx, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ctx: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.store()).list().await?;

    Ok(OrdersTemplate {
        ctx,
        admin: AdminView::from(&admin),
        orders: orders.iter().map(OrderRow::from).collect(),
    })
}
