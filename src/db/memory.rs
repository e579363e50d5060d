//! In-process storage adapters with the same contracts as the PostgreSQL ones.
//!
//! Uniqueness is enforced under each adapter's lock, the way the database
//! enforces it with a unique index.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{tokens::not_found, TokenStore, UserDirectory};
use crate::{
    error::AuthError,
    models::{
        token::{NewToken, Token, TokenKind},
        user::User,
    },
};

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the user as deleted. The row is kept but no longer found.
    pub async fn soft_delete(&self, device_uuid: &str) -> bool {
        let mut users = self.users.lock().await;
        match users
            .iter_mut()
            .find(|u| u.device_uuid == device_uuid && u.deleted_at.is_none())
        {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn create_with_device_id(&self, device_uuid: &str) -> Result<User, AuthError> {
        let mut users = self.users.lock().await;

        // The unique index covers soft-deleted rows too.
        if users.iter().any(|u| u.device_uuid == device_uuid) {
            return Err(AuthError::Conflict(format!(
                "device {device_uuid} is already registered"
            )));
        }

        let now = Utc::now();
        let user = User {
            id: users.len() as i64 + 1,
            device_uuid: device_uuid.to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_device_id(&self, device_uuid: &str) -> Result<User, AuthError> {
        self.users
            .lock()
            .await
            .iter()
            .find(|u| u.device_uuid == device_uuid && u.deleted_at.is_none())
            .cloned()
            .ok_or(AuthError::NotFound("user"))
    }
}

pub struct MemoryTokenStore {
    kind: TokenKind,
    tokens: Mutex<HashMap<String, Token>>,
}

impl MemoryTokenStore {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn insert(&self, new: NewToken) -> Result<Token, AuthError> {
        let mut tokens = self.tokens.lock().await;

        if tokens.contains_key(&new.value) {
            return Err(AuthError::Storage(format!(
                "{} token value collision",
                self.kind
            )));
        }

        let now = Utc::now();
        let token = Token {
            id: tokens.len() as i64 + 1,
            user_id: new.user_id,
            value: new.value,
            expired_at: new.expired_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tokens.insert(token.value.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_value(&self, value: &str) -> Result<Token, AuthError> {
        self.tokens
            .lock()
            .await
            .get(value)
            .filter(|t| t.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| not_found(self.kind))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    const DEVICE: &str = "0b6a8c3e-51f2-4d7a-9c1e-7f3e2d4b5a60";

    #[tokio::test]
    async fn test_duplicate_device_conflicts() {
        let users = MemoryUserDirectory::new();

        let first = users.create_with_device_id(DEVICE).await.unwrap();
        let second = users.create_with_device_id(DEVICE).await;

        assert_eq!(first.device_uuid, DEVICE);
        assert!(matches!(second, Err(AuthError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_find_unknown_device() {
        let users = MemoryUserDirectory::new();
        let result = users.find_by_device_id(DEVICE).await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_soft_deleted_user_is_hidden_but_keeps_device() {
        let users = MemoryUserDirectory::new();
        users.create_with_device_id(DEVICE).await.unwrap();

        assert!(users.soft_delete(DEVICE).await);
        assert!(matches!(
            users.find_by_device_id(DEVICE).await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            users.create_with_device_id(DEVICE).await,
            Err(AuthError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_created_token_is_resolvable() {
        let store = MemoryTokenStore::new(TokenKind::Session);

        let token = store.create_for_user(42, Duration::minutes(15)).await.unwrap();
        let found = store.find_by_value(&token.value).await.unwrap();

        assert_eq!(found.user_id, 42);
        assert_eq!(found.value, token.value);
        assert!(!found.is_expired());
    }

    #[tokio::test]
    async fn test_value_collision_is_storage_error() {
        let store = MemoryTokenStore::new(TokenKind::Refresh);
        let new = NewToken::mint(1, Duration::days(1)).unwrap();

        store.insert(new.clone()).await.unwrap();
        let result = store.insert(new).await;

        assert!(matches!(result, Err(AuthError::Storage(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_kinds_are_partitioned() {
        let sessions = MemoryTokenStore::new(TokenKind::Session);
        let refreshes = MemoryTokenStore::new(TokenKind::Refresh);

        let refresh = refreshes.create_for_user(1, Duration::days(30)).await.unwrap();

        assert!(matches!(
            sessions.find_by_value(&refresh.value).await,
            Err(AuthError::NotFound("session token"))
        ));
    }
}
