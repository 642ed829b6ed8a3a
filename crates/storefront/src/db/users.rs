//! User profile repository.

use bbs_core::{Email, User, UserId};
use serde_json::Value;

use super::{DocumentStore, RepositoryError, collections, decode, decode_all, encode};

/// Repository for user profile documents.
pub struct UserRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All users, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let docs = self.store.list(collections::USERS).await?;
        decode_all(collections::USERS, docs)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    /// Returns `RepositoryError::DataCorruption` if the profile does not decode.
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.store
            .get(collections::USERS, id.as_str())
            .await?
            .map(|doc| decode(collections::USERS, doc))
            .transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let docs = self
            .store
            .filter_eq(
                collections::USERS,
                "email",
                &Value::String(email.as_str().to_owned()),
            )
            .await?;
        let users: Vec<User> = decode_all(collections::USERS, docs)?;
        Ok(users.into_iter().next())
    }

    /// Create or replace a profile under its own id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the store fails.
    pub async fn put(&self, user: &User) -> Result<(), RepositoryError> {
        let doc = encode(collections::USERS, user)?;
        self.store
            .put(collections::USERS, user.id.as_str(), doc)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::MemoryDocumentStore;

    #[tokio::test]
    async fn test_put_get_and_lookup_by_email() {
        let store = MemoryDocumentStore::new();
        let repo = UserRepository::new(&store);
        let user = User::new_customer(
            UserId::new("user3"),
            "Charlie",
            "Brown",
            Email::parse("charlie@example.com").unwrap(),
            NaiveDate::from_ymd_opt(2023, 8, 1).unwrap(),
            "user-avatar-1",
        );
        repo.put(&user).await.unwrap();

        assert_eq!(repo.get(&user.id).await.unwrap(), Some(user.clone()));
        let by_email = repo
            .get_by_email(&Email::parse("CHARLIE@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert!(
            repo.get_by_email(&Email::parse("nobody@example.com").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}
