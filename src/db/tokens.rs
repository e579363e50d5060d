use async_trait::async_trait;
use chrono::Duration;
use sqlx::PgPool;

use crate::{
    error::{is_unique_violation, AuthError},
    models::token::{NewToken, Token, TokenKind},
};

/// Persists tokens of a single kind, keyed by their value.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists a precomputed row. A value collision is a storage failure.
    async fn insert(&self, new: NewToken) -> Result<Token, AuthError>;

    /// Exact match on the value index, ignoring soft-deleted rows. Expiry is not checked here.
    async fn find_by_value(&self, value: &str) -> Result<Token, AuthError>;

    /// Mints a fresh value that expires `validity` from now and stores it.
    async fn create_for_user(&self, user_id: i64, validity: Duration) -> Result<Token, AuthError> {
        let new = NewToken::mint(user_id, validity)?;
        self.insert(new).await
    }
}

pub(crate) fn not_found(kind: TokenKind) -> AuthError {
    match kind {
        TokenKind::Session => AuthError::NotFound("session token"),
        TokenKind::Refresh => AuthError::NotFound("refresh token"),
    }
}

#[derive(Clone)]
pub struct PgTokenStore {
    pool: PgPool,
    kind: TokenKind,
}

impl PgTokenStore {
    pub fn new(pool: PgPool, kind: TokenKind) -> Self {
        Self { pool, kind }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn insert(&self, new: NewToken) -> Result<Token, AuthError> {
        let table = self.kind.table_name();

        sqlx::query_as::<_, Token>(&format!(
            "INSERT INTO {table} (user_id, value, expired_at) VALUES ($1, $2, $3)
             RETURNING id, user_id, value, expired_at, created_at, updated_at, deleted_at"
        ))
        .bind(new.user_id)
        .bind(&new.value)
        .bind(new.expired_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::Storage(format!("{} token value collision", self.kind))
            } else {
                e.into()
            }
        })
    }

    async fn find_by_value(&self, value: &str) -> Result<Token, AuthError> {
        let table = self.kind.table_name();

        sqlx::query_as::<_, Token>(&format!(
            "SELECT id, user_id, value, expired_at, created_at, updated_at, deleted_at
             FROM {table} WHERE value = $1 AND deleted_at IS NULL"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(self.kind))
    }
}
