//! Request-level errors.
//!
//! Handlers return `Result<_, AppError>`. Failures on our side are reported
//! to Sentry before the response goes out; the body never carries the
//! underlying error text for those.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ai::FlowError;
use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Everything a storefront handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("store: {0}")]
    Database(#[from] RepositoryError),

    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    #[error("prompt flow: {0}")]
    Ai(#[from] FlowError),

    #[error("session: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("template: {0}")]
    Template(#[from] askama::Error),

    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The visitor is signed in but their profile is gone.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl AppError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Template(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Ai(FlowError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Ai(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(AuthError::InvalidCredentials | AuthError::UserNotFound)
            | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            Self::Auth(
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) | AuthError::MissingField(_),
            ) => StatusCode::BAD_REQUEST,
            Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Body text safe to show the visitor.
    pub fn public_message(&self) -> String {
        match self {
            Self::Auth(err) => err.user_message(),
            Self::Ai(_) => "The assistant is unavailable right now.".to_string(),
            Self::NotFound(_) => "Not found".to_string(),
            Self::Unauthorized(_) => "Please sign in again.".to_string(),
            Self::Database(_) | Self::Session(_) | Self::Template(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Errors we want to hear about.
    fn is_reportable(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_reportable() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        (self.status(), self.public_message()).into_response()
    }
}

/// Attach the signed-in user to Sentry events from this point on.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Detach the user on sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

/// Record a user action on the Sentry breadcrumb trail.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "prod1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data.unwrap_or_default() {
        breadcrumb
            .data
            .insert((*key).to_owned(), serde_json::Value::from(*value));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("prod9".into()), StatusCode::NOT_FOUND),
            (AppError::Unauthorized("gone".into()), StatusCode::UNAUTHORIZED),
            (
                AppError::Database(RepositoryError::NotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Auth(AuthError::UserAlreadyExists), StatusCode::CONFLICT),
            (
                AppError::Auth(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Ai(FlowError::InvalidInput("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Ai(FlowError::MalformedOutput("x".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = AppError::Database(RepositoryError::DataCorruption("column x".into()));
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.is_reportable());

        let err = AppError::Auth(AuthError::UserAlreadyExists);
        assert_eq!(
            err.public_message(),
            "An account with this email already exists."
        );
        assert!(!err.is_reportable());
    }

    #[test]
    fn test_into_response_uses_status() {
        let response = AppError::NotFound("prod9".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
