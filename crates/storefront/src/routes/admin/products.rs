//! Admin product management.
//!
//! The generate and create handlers re-render the page directly so the
//! toast and the typed form values arrive in the same response.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bbs_core::{NewProduct, Product, ProductId};

use super::AdminView;
use crate::ai::flows::{
    FlowError, GenerateProductDescriptionInput, generate_product_description,
};
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::{PageContext, RequireAdmin};
use crate::models::Flash;
use crate::state::AppState;
use crate::views::image_url;

/// Row in the products table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub image: String,
    pub in_stock: bool,
    pub status: &'static str,
    pub price: String,
    pub stock: u32,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            image: image_url(product.primary_image().unwrap_or_default()),
            in_stock: product.in_stock(),
            status: if product.in_stock() {
                "In Stock"
            } else {
                "Out of Stock"
            },
            price: product.effective_price_display(),
            stock: product.stock,
        }
    }
}

/// Add-product form fields, shared by generate and create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub features: String,
    pub description: String,
}

/// Products page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct ProductsTemplate {
    pub ctx: PageContext,
    pub admin: AdminView,
    pub products: Vec<ProductRow>,
    pub form: ProductForm,
}

fn generation_failed() -> Flash {
    Flash::error(
        "Generation Failed",
        "Could not generate a description at this time.",
    )
}

async fn render(
    state: &AppState,
    admin: &bbs_core::User,
    ctx: PageContext,
    form: ProductForm,
) -> Result<Response, AppError> {
    let products = ProductRepository::new(state.store()).list().await?;

    Ok(ProductsTemplate {
        ctx,
        admin: AdminView::from(admin),
        products: products.iter().map(ProductRow::from).collect(),
        form,
    }
    .into_response())
}

/// Display the products table and an empty add form.
///
/// # Errors
///
/// Returns an error if the products cannot be read.
#[instrument(skip(state, ctx, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ctx: PageContext,
) -> Result<Response, AppError> {
    render(&state, &admin, ctx, ProductForm::default()).await
}

/// Fill the description field from the product name and features.
///
/// # Errors
///
/// Returns an error if the products cannot be read. Generation failures
/// become a toast.
#[instrument(skip(state, ctx, admin, form), fields(admin_id = %admin.id))]
pub async fn generate(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut ctx: PageContext,
    Form(mut form): Form<ProductForm>,
) -> Result<Response, AppError> {
    if form.name.trim().is_empty() || form.features.trim().is_empty() {
        ctx.flashes.push(Flash::error(
            "Missing Information",
            "Please provide a product name and key features.",
        ));
        return render(&state, &admin, ctx, form).await;
    }

    let input = GenerateProductDescriptionInput {
        product_name: form.name.clone(),
        key_features: form.features.clone(),
    };

    let Some(generator) = state.generator() else {
        tracing::warn!("No text generator configured");
        ctx.flashes.push(generation_failed());
        return render(&state, &admin, ctx, form).await;
    };

    match generate_product_description(generator, &input).await {
        Ok(output) => {
            add_breadcrumb("admin", "Generated product description", None);
            form.description = output.product_description;
        }
        Err(FlowError::Generation(e)) if e.is_misconfiguration() => {
            tracing::error!(error = %e, "Text generator rejected the configured credentials");
            ctx.flashes.push(generation_failed());
        }
        Err(e) => {
            tracing::warn!(error = %e, "Product description generation failed");
            ctx.flashes.push(generation_failed());
        }
    }

    render(&state, &admin, ctx, form).await
}

/// Create a product from the add form.
///
/// # Errors
///
/// Returns an error if the product cannot be stored.
#[instrument(skip(state, ctx, admin, form), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut ctx: PageContext,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    if form.name.trim().is_empty() || form.description.trim().is_empty() {
        ctx.flashes.push(Flash::error(
            "Missing Information",
            "Please provide a product name and description.",
        ));
        return render(&state, &admin, ctx, form).await;
    }

    let product = ProductRepository::new(state.store())
        .create(NewProduct::draft(&form.name, &form.description, &form.features))
        .await?;

    tracing::info!(product_id = %product.id, "Product created");
    ctx.flashes.push(Flash::success(
        "Product Added",
        format!("{} has been added to the store.", product.name),
    ));

    render(&state, &admin, ctx, ProductForm::default()).await
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the store fails or the session cannot be written.
#[instrument(skip(state, session, admin), fields(admin_id = %admin.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let repo = ProductRepository::new(state.store());
    let id = ProductId::new(id);

    let Some(product) = repo.get(&id).await? else {
        return Ok(Redirect::to("/admin/products"));
    };

    match repo.delete(&id).await {
        Ok(()) | Err(RepositoryError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(product_id = %id, "Product deleted");
    Flash::error("Product Deleted", format!("{} has been removed.", product.name))
        .push(&session)
        .await?;

    Ok(Redirect::to("/admin/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_row_status_follows_stock() {
        let product = NewProduct::draft("Mixer", "A mixer.", "knobs")
            .with_id(ProductId::new("p1"));
        let row = ProductRow::from(&product);
        assert!(!row.in_stock);
        assert_eq!(row.status, "Out of Stock");
        assert_eq!(row.image, "/images/placeholder");
        assert_eq!(row.price, "$0.00");
    }
}
