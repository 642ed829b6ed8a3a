//! Authentication service.
//!
//! Email + password accounts. A credential document holds the Argon2 hash;
//! the matching profile in `users` shares its id.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use tower_sessions::Session;

use bbs_core::{Email, User};

use crate::db::{CredentialRepository, DocumentStore, RepositoryError, UserRepository};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Avatars handed out at sign-up.
const SIGNUP_AVATARS: [&str; 2] = ["user-avatar-1", "user-avatar-2"];

/// Sign-up form fields.
#[derive(Debug, Clone)]
pub struct SignUp<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    credentials: CredentialRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            users: UserRepository::new(store),
            credentials: CredentialRepository::new(store),
        }
    }

    /// Register a new customer and create their profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn sign_up(&self, form: &SignUp<'_>) -> Result<User, AuthError> {
        if form.first_name.trim().is_empty() {
            return Err(AuthError::MissingField("first name"));
        }
        if form.last_name.trim().is_empty() {
            return Err(AuthError::MissingField("last name"));
        }
        let email = Email::parse(form.email)?;
        validate_password(form.password)?;

        // Seeded profiles have no credential but still own their email.
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(form.password)?;

        let credential = self
            .credentials
            .create(&email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let user = User::new_customer(
            credential.id.clone(),
            form.first_name,
            form.last_name,
            email,
            Utc::now().date_naive(),
            random_avatar(),
        );

        if let Err(e) = self.users.put(&user).await {
            // Leave no credential without a profile behind.
            if let Err(rollback) = self.credentials.delete(&credential.id).await {
                tracing::error!(
                    error = %rollback,
                    user_id = %credential.id,
                    "Failed to remove credential after profile write failed"
                );
            }
            return Err(e.into());
        }

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::UserNotFound` if the credential has no profile.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let credential = self
            .credentials
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credential.password_hash)?;

        self.users
            .get(&credential.id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// End the visitor's session, including cart and identity.
///
/// # Errors
///
/// Returns an error if the session store cannot delete the session.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

fn random_avatar() -> &'static str {
    let index = rand::random_range(0..SIGNUP_AVATARS.len());
    SIGNUP_AVATARS.get(index).copied().unwrap_or("user-avatar-1")
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryDocumentStore;

    fn form<'a>(email: &'a str, password: &'a str) -> SignUp<'a> {
        SignUp {
            first_name: "Dana",
            last_name: "Scully",
            email,
            password,
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let store = MemoryDocumentStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .sign_up(&form("Dana@Example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "dana@example.com");
        assert!(!user.is_admin);
        assert_eq!(user.order_count, 0);
        assert!(SIGNUP_AVATARS.contains(&user.avatar.as_str()));

        let signed_in = auth
            .sign_in("dana@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(signed_in.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryDocumentStore::new();
        let auth = AuthService::new(&store);

        auth.sign_up(&form("dana@example.com", "correct horse"))
            .await
            .unwrap();
        let err = auth
            .sign_up(&form("DANA@example.com", "another pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_seeded_profile_email_is_taken() {
        let store = MemoryDocumentStore::new();
        let seeded = User::new_customer(
            bbs_core::UserId::new("user1"),
            "Alice",
            "Johnson",
            Email::parse("alice@example.com").unwrap(),
            Utc::now().date_naive(),
            "user-avatar-1",
        );
        UserRepository::new(&store).put(&seeded).await.unwrap();

        let err = AuthService::new(&store)
            .sign_up(&form("alice@example.com", "correct horse"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let store = MemoryDocumentStore::new();
        let auth = AuthService::new(&store);
        auth.sign_up(&form("dana@example.com", "correct horse"))
            .await
            .unwrap();

        let wrong = auth.sign_in("dana@example.com", "wrong horse").await;
        let unknown = auth.sign_in("fox@example.com", "correct horse").await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_up_validation() {
        let store = MemoryDocumentStore::new();
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.sign_up(&form("dana@example.com", "short")).await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.sign_up(&form("not-an-email", "correct horse")).await,
            Err(AuthError::InvalidEmail(_))
        ));

        let blank_name = SignUp {
            first_name: " ",
            ..form("dana@example.com", "correct horse")
        };
        assert!(matches!(
            auth.sign_up(&blank_name).await,
            Err(AuthError::MissingField("first name"))
        ));
    }

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
