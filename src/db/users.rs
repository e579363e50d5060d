use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::{is_unique_violation, AuthError},
    models::user::User,
};

/// Maps device identifiers to users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Inserts a new user. A device that is already registered yields
    /// [`AuthError::Conflict`], raised by the storage uniqueness constraint.
    async fn create_with_device_id(&self, device_uuid: &str) -> Result<User, AuthError>;

    async fn find_by_device_id(&self, device_uuid: &str) -> Result<User, AuthError>;
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn create_with_device_id(&self, device_uuid: &str) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (device_uuid) VALUES ($1)
             RETURNING id, device_uuid, created_at, updated_at, deleted_at",
        )
        .bind(device_uuid)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::Conflict(format!("device {device_uuid} is already registered"))
            } else {
                e.into()
            }
        })
    }

    async fn find_by_device_id(&self, device_uuid: &str) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            "SELECT id, device_uuid, created_at, updated_at, deleted_at
             FROM users WHERE device_uuid = $1 AND deleted_at IS NULL",
        )
        .bind(device_uuid)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::NotFound("user"))
    }
}
