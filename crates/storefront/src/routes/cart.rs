//! Cart route handlers.
//!
//! Cart lines live in the session under `cart`. Every mutation is a form
//! post that redirects back, with a toast queued for the next page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bbs_core::{Cart, CartItem, CartTotals, NewOrder, Price, ProductId};

use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::{PageContext, RequireAuth};
use crate::models::{Flash, session_keys};
use crate::state::AppState;
use crate::views::image_url;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub line_total: String,
    pub quantity: u32,
    /// Quantity after pressing "-"; zero removes the line.
    pub decrement: u32,
    pub increment: u32,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image: image_url(item.product.primary_image().unwrap_or_default()),
            unit_price: item.product.effective_price_display(),
            line_total: Price::usd(item.line_total()).display(),
            quantity: item.quantity,
            decrement: item.quantity.saturating_sub(1),
            increment: item.quantity.saturating_add(1),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub ctx: PageContext,
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session; a missing cart is empty.
async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Resolve the session cart against the catalog.
///
/// Lines whose product no longer exists are dropped.
async fn cart_items(state: &AppState, cart: &Cart) -> Result<Vec<CartItem>, AppError> {
    if cart.is_empty() {
        return Ok(Vec::new());
    }
    let products = ProductRepository::new(state.store())
        .get_by_ids(&cart.product_ids())
        .await?;
    Ok(cart.resolve(&products))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
///
/// # Errors
///
/// Returns an error if the session or catalog cannot be read.
#[instrument(skip(state, session, ctx))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    ctx: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let cart = load_cart(&session).await?;
    let items = cart_items(&state, &cart).await?;
    let totals = CartTotals::for_items(&items);

    Ok(CartTemplate {
        ctx,
        lines: items.iter().map(CartLineView::from).collect(),
        item_count: totals.item_count,
        subtotal: totals.subtotal_display(),
        shipping: totals.shipping_display(),
        total: totals.total_display(),
    })
}

/// Add a product to the cart, merging with an existing line.
///
/// Out-of-stock products are refused and the line never exceeds the
/// product's stock.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse, AppError> {
    let product_id = ProductId::new(form.product_id);
    let product = ProductRepository::new(state.store())
        .get(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    let quantity = form.quantity.unwrap_or(1).max(1);
    let product_page = format!("/products/{}", product.id);

    if !product.in_stock() {
        Flash::error(
            "Out of Stock",
            format!("{} is currently unavailable.", product.name),
        )
        .push(&session)
        .await?;
        return Ok(Redirect::to(&product_page));
    }

    let mut cart = load_cart(&session).await?;
    let added = cart.add_up_to(&product.id, quantity, product.stock);
    if added == 0 {
        Flash::error(
            "Stock Limit Reached",
            format!("Your cart already holds all {} in stock.", product.stock),
        )
        .push(&session)
        .await?;
        return Ok(Redirect::to(&product_page));
    }
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", product.id.as_str())]),
    );
    Flash::success("Added to cart!", format!("{added} x {}", product.name))
        .push(&session)
        .await?;

    Ok(Redirect::to(&product_page))
}

/// Set a line's quantity, capped at the product's stock. Zero or less
/// removes the line.
///
/// # Errors
///
/// Returns an error if the product lookup or the session update fails.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<impl IntoResponse, AppError> {
    let product_id = ProductId::new(form.product_id);
    let mut quantity = form.quantity;
    if quantity > 0
        && let Some(product) = ProductRepository::new(state.store()).get(&product_id).await?
    {
        quantity = quantity.min(i64::from(product.stock));
    }

    let mut cart = load_cart(&session).await?;
    cart.update_quantity(&product_id, quantity);
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be updated.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse, AppError> {
    let product_id = ProductId::new(form.product_id);
    let mut cart = load_cart(&session).await?;

    if cart.remove(&product_id) {
        save_cart(&session, &cart).await?;

        let name = ProductRepository::new(state.store())
            .get(&product_id)
            .await?
            .map_or_else(|| "The item".to_string(), |p| p.name);
        Flash::success(
            "Item removed",
            format!("{name} has been removed from your cart."),
        )
        .push(&session)
        .await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Place an order for everything in the cart.
///
/// Totals come from the current catalog prices. The order starts out
/// `Pending`; the profile's order count is bumped without any concurrency
/// check.
///
/// # Errors
///
/// Returns an error if the order or profile cannot be written.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let mut cart = load_cart(&session).await?;
    let items = cart_items(&state, &cart).await?;
    if items.is_empty() {
        return Ok(Redirect::to("/cart"));
    }

    let users = UserRepository::new(state.store());
    let mut profile = users
        .get(&user.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("profile not found".to_string()))?;

    let totals = CartTotals::for_items(&items);
    let order = OrderRepository::new(state.store())
        .create(NewOrder::from_cart(
            &profile,
            &totals,
            Utc::now().date_naive(),
        ))
        .await?;

    profile.order_count = profile.order_count.saturating_add(1);
    users.put(&profile).await?;

    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
    Flash::success(
        "Order placed!",
        format!("Order {} is confirmed. Thank you for shopping with us.", order.id),
    )
    .push(&session)
    .await?;

    Ok(Redirect::to("/account"))
}
