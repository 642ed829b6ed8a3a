//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::db::{CategoryRepository, ProductRepository};
use crate::error::AppError;
use crate::middleware::PageContext;
use crate::state::AppState;
use crate::views::{CategoryTile, ProductCard, image_url};

/// Products shown in each home page rail.
const RAIL_SIZE: usize = 4;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub ctx: PageContext,
    pub hero_image: String,
    pub categories: Vec<CategoryTile>,
    pub featured: Vec<ProductCard>,
    pub top_rated: Vec<ProductCard>,
}

/// Display the home page.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
#[instrument(skip(state, ctx))]
pub async fn home(
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.store());
    let categories = CategoryRepository::new(state.store()).list().await?;
    let featured = products.featured(RAIL_SIZE).await?;
    let top_rated = products.top_rated(RAIL_SIZE).await?;

    Ok(HomeTemplate {
        ctx,
        hero_image: image_url("hero-home"),
        categories: categories.iter().map(CategoryTile::from).collect(),
        featured: ProductCard::for_all(&featured),
        top_rated: ProductCard::for_all(&top_rated),
    })
}
