//! Admin customers table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use super::AdminView;
use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::{PageContext, RequireAdmin};
use crate::state::AppState;
use crate::views::UserRow;

/// Customers page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub ctx: PageContext,
    pub admin: AdminView,
    pub users: Vec<UserRow>,
}

/// List every customer profile.
///
/// # Errors
///
/// Returns an error if the profiles cannot be read.
#[instrument(skip(state, ctx, admin), fields(admin_id = %admin.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ctx: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let users = UserRepository::new(state.store()).list().await?;

    Ok(UsersTemplate {
        ctx,
        admin: AdminView::from(&admin),
        users: users.iter().map(UserRow::from).collect(),
    })
}
