//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use bbs_core::Price;
use bbs_core::order::revenue;

use super::AdminView;
use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::{PageContext, RequireAdmin};
use crate::state::AppState;
use crate::views::OrderRow;

/// Orders listed under "Recent Orders".
const RECENT_ORDERS: usize = 5;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub admin: AdminView,
    pub product_count: usize,
    pub order_count: usize,
    pub customer_count: usize,
    pub revenue: String,
    pub recent_orders: Vec<OrderRow>,
}

/// Display the dashboard.
///
/// Revenue is the sum of every order total except cancelled orders.
///
/// # Errors
///
/// Returns an error if a collection cannot be read.
#[instrument(skip(state, ctx, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ctx: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.store()).list().await?;
    let orders = OrderRepository::new(state.store()).list().await?;
    let customers = UserRepository::new(state.store()).list().await?;

    Ok(DashboardTemplate {
        ctx,
        admin: AdminView::from(&admin),
        product_count: products.len(),
        order_count: orders.len(),
        customer_count: customers.len(),
        revenue: Price::usd(revenue(&orders)).display(),
        recent_orders: orders.iter().take(RECENT_ORDERS).map(OrderRow::from).collect(),
    })
}
