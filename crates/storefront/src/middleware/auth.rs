//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in user, and an admin, in
//! route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use bbs_core::User;

use crate::db::{RepositoryError, UserRepository};
use crate::error::AppError;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in user.
///
/// If nobody is signed in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.first_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is signed in.
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The session layer is missing from the router.
    MissingSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::MissingSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::MissingSession)?;

        let user = current_user(session)
            .await
            .ok_or(AuthRejection::RedirectToLogin)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// signed in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };

        Ok(Self(user))
    }
}

/// Extractor that requires a signed-in admin.
///
/// The session only says who the visitor is. Whether they are an admin is
/// decided by the stored profile, re-read on every request, so revoking the
/// flag takes effect immediately.
pub struct RequireAdmin(pub User);

/// Error returned when an admin route is requested by anyone else.
pub enum AdminRejection {
    /// Anonymous or non-admin visitor; sent back to the home page.
    RedirectHome,
    /// The profile lookup failed.
    Repository(RepositoryError),
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::Repository(e) => AppError::Database(e).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Err(AdminRejection::RedirectHome);
        };
        let Some(current) = current_user(session).await else {
            return Err(AdminRejection::RedirectHome);
        };

        let profile = UserRepository::new(state.store())
            .get(&current.id)
            .await
            .map_err(AdminRejection::Repository)?;

        match profile {
            Some(user) if user.is_admin => Ok(Self(user)),
            _ => {
                tracing::warn!(user_id = %current.id, path = %parts.uri.path(), "Non-admin refused");
                Err(AdminRejection::RedirectHome)
            }
        }
    }
}

async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Helper to set the current user in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}
