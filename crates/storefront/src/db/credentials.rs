//! Password credentials.
//!
//! Kept apart from profiles so page handlers that read `users` never see a
//! password hash.

use bbs_core::{Email, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DocumentStore, RepositoryError, collections, decode_all, encode};

/// A stored credential, keyed by the owning user's id.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: UserId,
    pub email: Email,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Repository for the `credentials` collection.
pub struct CredentialRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CredentialRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Look a credential up by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Credential>, RepositoryError> {
        let docs = self
            .store
            .filter_eq(
                collections::CREDENTIALS,
                "email",
                &Value::String(email.as_str().to_owned()),
            )
            .await?;
        let credentials: Vec<Credential> = decode_all(collections::CREDENTIALS, docs)?;
        Ok(credentials.into_iter().next())
    }

    /// Store a new credential.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create(&self, email: &Email, password_hash: &str) -> Result<Credential, RepositoryError> {
        if self.get_by_email(email).await?.is_some() {
            return Err(RepositoryError::Conflict(format!(
                "email {email} is already registered"
            )));
        }

        let doc = encode(
            collections::CREDENTIALS,
            &serde_json::json!({
                "email": email,
                "passwordHash": password_hash,
            }),
        )?;
        let id = self.store.insert(collections::CREDENTIALS, doc).await?;

        Ok(Credential {
            id: UserId::new(id),
            email: email.clone(),
            password_hash: password_hash.to_owned(),
        })
    }

    /// Remove a credential, e.g. to roll back a half-finished sign-up.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn delete(&self, id: &UserId) -> Result<bool, RepositoryError> {
        Ok(self
            .store
            .delete(collections::CREDENTIALS, id.as_str())
            .await?)
    }
}
