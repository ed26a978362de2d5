//! Credential store contract.
//!
//! User persistence lives outside this crate; handlers that need a fresh user
//! record (e.g. `/me`) go through [`CredentialStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Role, UserId};

/// A user as seen by the auth boundary. Password material is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialStoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// Read contract of the user store.
///
/// Lookups may suspend (network-backed stores); a missing user is `Ok(None)`.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, CredentialStoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, CredentialStoreError>;
}

/// In-memory credential store.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user record.
    pub fn insert(&self, user: UserRecord) -> Result<(), CredentialStoreError> {
        self.users
            .write()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?
            .insert(user.id.clone(), user);
        Ok(())
    }

    pub fn remove(&self, id: &UserId) -> Result<Option<UserRecord>, CredentialStoreError> {
        Ok(self
            .users
            .write()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?
            .remove(id))
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, CredentialStoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, CredentialStoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| CredentialStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserRecord {
        UserRecord {
            id: UserId::new("user123"),
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn finds_by_id_and_email() {
        let store = InMemoryCredentialStore::new();
        store.insert(alice()).unwrap();

        assert_eq!(store.find_by_id(&UserId::new("user123")).await.unwrap(), Some(alice()));
        assert_eq!(
            store.find_by_email("ALICE@example.com").await.unwrap(),
            Some(alice())
        );
    }

    #[tokio::test]
    async fn missing_user_is_none() {
        let store = InMemoryCredentialStore::new();
        store.insert(alice()).unwrap();
        store.remove(&UserId::new("user123")).unwrap();

        assert_eq!(store.find_by_id(&UserId::new("user123")).await.unwrap(), None);
        assert_eq!(store.find_by_email("bob@example.com").await.unwrap(), None);
    }
}
