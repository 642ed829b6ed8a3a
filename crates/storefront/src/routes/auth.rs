//! Authentication route handlers.
//!
//! Email + password sign-in and sign-up. Failures the visitor can fix are
//! reported as toasts on the form they came from.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, PageContext, set_current_user};
use crate::models::{CurrentUser, Flash};
use crate::services::auth::{self, AuthService, SignUp};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Sign-up form data.
#[derive(Deserialize)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub ctx: PageContext,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page, or go to the account page if already signed in.
pub async fn login_page(OptionalAuth(user): OptionalAuth, ctx: PageContext) -> Response {
    if user.is_some() {
        return Redirect::to("/account").into_response();
    }
    LoginTemplate { ctx }.into_response()
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns an error if the store or session fails.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.store())
        .sign_in(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "Signed in");
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) if e.is_input_error() => {
            tracing::warn!(error = %e, "Sign-in failed");
            Flash::error("Sign-in Failed", e.user_message())
                .push(&session)
                .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Display the sign-up page, or go to the account page if already signed in.
pub async fn signup_page(OptionalAuth(user): OptionalAuth, ctx: PageContext) -> Response {
    if user.is_some() {
        return Redirect::to("/account").into_response();
    }
    SignupTemplate { ctx }.into_response()
}

/// Handle sign-up form submission. A new account is signed in straight away.
///
/// # Errors
///
/// Returns an error if the store or session fails.
#[instrument(skip(state, session, form))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let request = SignUp {
        first_name: form.first_name.trim(),
        last_name: form.last_name.trim(),
        email: &form.email,
        password: &form.password,
    };

    match AuthService::new(state.store()).sign_up(&request).await {
        Ok(user) => {
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            Flash::success("Account Created!", "Welcome to BBS Entertainment!")
                .push(&session)
                .await?;
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) if e.is_input_error() => {
            tracing::warn!(error = %e, "Sign-up failed");
            Flash::error("Sign-up Failed", e.user_message())
                .push(&session)
                .await?;
            Ok(Redirect::to("/signup").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Sign out, dropping the whole session including the cart.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    auth::sign_out(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
