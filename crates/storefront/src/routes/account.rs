//! Account route handlers.
//!
//! These routes require authentication.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use bbs_core::{ProductId, User};

use crate::ai::TextGenerator;
use crate::ai::flows::{ProductRecommendationsInput, recommend_products};
use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::Flash;
use crate::services::auth;
use crate::state::AppState;
use crate::views::{OrderRow, ProductCard, image_url};

/// Most recommendations shown on the account page.
const MAX_RECOMMENDATIONS: usize = 4;

/// Profile display data for templates.
#[derive(Clone)]
pub struct ProfileView {
    pub name: String,
    pub initial: String,
    pub email: String,
    pub avatar: String,
    pub joined: String,
    pub is_admin: bool,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            name: user.full_name(),
            initial: user.initials(),
            email: user.email.to_string(),
            avatar: image_url(&user.avatar),
            joined: user.joined.format("%B %-d, %Y").to_string(),
            is_admin: user.is_admin,
        }
    }
}

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub ctx: PageContext,
    pub profile: ProfileView,
    pub orders: Vec<OrderRow>,
    pub favorites: Vec<ProductCard>,
    pub recommendations: Vec<ProductCard>,
}

/// Display account overview page.
///
/// Recommendations are best-effort: they are skipped when no generator is
/// configured or the flow fails.
///
/// # Errors
///
/// Returns an error if the profile, orders or favorites cannot be read.
#[instrument(skip(state, session, ctx, current), fields(user_id = %current.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    ctx: PageContext,
) -> Result<Response, AppError> {
    let Some(user) = UserRepository::new(state.store()).get(&current.id).await? else {
        tracing::warn!("Session refers to a missing profile; signing out");
        auth::sign_out(&session).await?;
        return Ok(Redirect::to("/login").into_response());
    };

    let products = ProductRepository::new(state.store());
    let orders = OrderRepository::new(state.store())
        .list_for_user(&user.id)
        .await?;
    let favorites = products.get_by_ids(&user.favorite_product_ids).await?;

    let recommendations = match state.generator() {
        Some(generator) => recommendations_for(generator, &products, &user).await,
        None => Vec::new(),
    };

    Ok(AccountIndexTemplate {
        ctx,
        profile: ProfileView::from(&user),
        orders: orders.iter().map(OrderRow::from).collect(),
        favorites: ProductCard::for_all(&favorites),
        recommendations,
    }
    .into_response())
}

/// Ask the recommendations flow for products the user might like.
///
/// Favorites stand in for browsing history. Ids the catalog does not know
/// and products already favorited are dropped. Any failure, including
/// reading the catalog, yields no recommendations.
async fn recommendations_for(
    generator: &dyn TextGenerator,
    products: &ProductRepository<'_>,
    user: &User,
) -> Vec<ProductCard> {
    let catalog = match products.list().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog unavailable for recommendations");
            return Vec::new();
        }
    };

    let input = ProductRecommendationsInput {
        user_id: user.id.to_string(),
        browsing_history: Some(
            user.favorite_product_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        purchase_history: None,
        preferences: None,
        catalog: catalog.iter().map(|p| p.id.to_string()).collect(),
    };

    match recommend_products(generator, &input).await {
        Ok(output) => output
            .product_recommendations
            .iter()
            .filter_map(|id| catalog.iter().find(|p| p.id.as_str() == id))
            .filter(|p| !user.is_favorite(&p.id))
            .take(MAX_RECOMMENDATIONS)
            .map(ProductCard::from)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Recommendations unavailable");
            Vec::new()
        }
    }
}

/// Add or remove a product from the user's favorites.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product.
#[instrument(skip(state, session, current), fields(user_id = %current.id))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let product_id = ProductId::new(id);
    let product = ProductRepository::new(state.store())
        .get(&product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let users = UserRepository::new(state.store());
    let mut user = users
        .get(&current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("profile not found".to_string()))?;

    let flash = if user.toggle_favorite(&product.id) {
        Flash::success(
            "Added to favorites",
            format!("{} has been saved for later.", product.name),
        )
    } else {
        Flash::success(
            "Removed from favorites",
            format!("{} has been removed from your favorites.", product.name),
        )
    };
    users.put(&user).await?;
    flash.push(&session).await?;

    Ok(Redirect::to(&format!("/products/{}", product.id)))
}
