//! Sign-up and sign-in failures.

use thiserror::Error;

use crate::db::RepositoryError;

/// Why a sign-up or sign-in was refused.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The address did not parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bbs_core::EmailError),

    /// Unknown email or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A credential exists but its profile is gone.
    #[error("user not found")]
    UserNotFound,

    /// The email already has a credential.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The password fails the strength rules; the message says which.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// A required sign-up field was blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("store: {0}")]
    Repository(#[from] RepositoryError),

    /// Argon2 failed to hash or parse a stored hash.
    #[error("argon2 failure")]
    PasswordHash,
}

impl AuthError {
    /// Whether the visitor can fix this by changing what they typed.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        !matches!(self, Self::Repository(_) | Self::PasswordHash)
    }

    /// Message safe to show the visitor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials | Self::UserNotFound => {
                "Invalid email or password.".to_string()
            }
            Self::UserAlreadyExists => "An account with this email already exists.".to_string(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
            Self::MissingField(field) => format!("Please enter your {field}."),
            Self::Repository(_) | Self::PasswordHash => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
