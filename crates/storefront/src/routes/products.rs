//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bbs_core::catalog::unique_brands;
use bbs_core::{Product, ProductFilter, ProductId};

use crate::db::{CategoryRepository, ProductRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::{OptionalAuth, PageContext};
use crate::routes::pages::not_found_page;
use crate::state::AppState;
use crate::views::{ProductCard, StarsView, image_url};

/// Listing filters. Every field is optional; `all` disables a predicate.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
}

/// One option in a filter sidebar list.
#[derive(Clone)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub ctx: PageContext,
    pub search: String,
    pub categories: Vec<FilterOption>,
    pub brands: Vec<FilterOption>,
    pub products: Vec<ProductCard>,
    pub total: usize,
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub images: Vec<String>,
    pub price: String,
    pub list_price: String,
    pub on_sale: bool,
    pub in_stock: bool,
    pub stock: u32,
    pub max_quantity: u32,
    pub stars: StarsView,
    pub rating: String,
    pub reviews: u32,
    pub tags: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let mut images: Vec<String> = product.images.iter().map(|id| image_url(id)).collect();
        if images.is_empty() {
            images.push(image_url(""));
        }

        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            images,
            price: product.effective_price_display(),
            list_price: product.price_display(),
            on_sale: product.is_on_sale(),
            in_stock: product.in_stock(),
            stock: product.stock,
            max_quantity: product.stock.max(1),
            stars: StarsView::new(product.rating),
            rating: format!("{:.1}", product.rating),
            reviews: product.reviews,
            tags: product.tags.clone(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub ctx: PageContext,
    pub product: ProductView,
    pub signed_in: bool,
    pub is_favorite: bool,
}

/// Build sidebar options with an "All" entry first.
fn filter_options(
    all_label: &str,
    selected: &str,
    options: impl IntoIterator<Item = (String, String)>,
) -> Vec<FilterOption> {
    std::iter::once((ProductFilter::ALL.to_string(), all_label.to_string()))
        .chain(options)
        .map(|(value, label)| FilterOption {
            selected: value == selected,
            value,
            label,
        })
        .collect()
}

/// Display product listing page.
///
/// The result is the intersection of the search, category and brand
/// predicates.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[instrument(skip(state, ctx))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
    ctx: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.store()).list().await?;
    let categories = CategoryRepository::new(state.store()).list().await?;

    let filter = ProductFilter::from_params(
        query.q.as_deref(),
        query.category.as_deref(),
        query.brand.as_deref(),
    );
    let matching = filter.apply(&products);

    let category_options = filter_options(
        "All Categories",
        filter.category_param(),
        categories
            .iter()
            .map(|c| (c.id.to_string(), c.name.clone())),
    );
    let brand_options = filter_options(
        "All Brands",
        filter.brand_param(),
        unique_brands(&products)
            .into_iter()
            .map(|b| (b.clone(), b)),
    );

    Ok(ProductsIndexTemplate {
        ctx,
        search: filter.search.clone(),
        categories: category_options,
        brands: brand_options,
        total: matching.len(),
        products: ProductCard::for_all(matching),
    })
}

/// Display product detail page.
///
/// # Errors
///
/// Returns an error if the product or the visitor's profile cannot be read.
#[instrument(skip(state, ctx, user))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalAuth(user): OptionalAuth,
    ctx: PageContext,
) -> Result<Response, AppError> {
    let id = ProductId::new(id);
    let Some(product) = ProductRepository::new(state.store()).get(&id).await? else {
        return Ok(not_found_page(ctx));
    };

    let is_favorite = match &user {
        Some(current) => UserRepository::new(state.store())
            .get(&current.id)
            .await?
            .is_some_and(|profile| profile.is_favorite(&id)),
        None => false,
    };

    Ok(ProductShowTemplate {
        ctx,
        product: ProductView::from(&product),
        signed_in: user.is_some(),
        is_favorite,
    }
    .into_response())
}
