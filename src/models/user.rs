use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Length of a canonical hyphenated UUID, the only accepted `device_uuid` form.
pub const DEVICE_UUID_LENGTH: usize = 36;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub device_uuid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Checks that `value` is a hyphenated 36-character UUID.
pub fn is_valid_device_uuid(value: &str) -> bool {
    value.len() == DEVICE_UUID_LENGTH && uuid::Uuid::try_parse(value).is_ok()
}
