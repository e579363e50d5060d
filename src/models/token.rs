use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use crate::{error::AuthError, services::token_generator::generate_token};

/// Selects which storage partition a token lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Session,
    Refresh,
}

impl TokenKind {
    pub fn table_name(self) -> &'static str {
        match self {
            TokenKind::Session => "session_tokens",
            TokenKind::Refresh => "refresh_tokens",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::Session => "session",
            TokenKind::Refresh => "refresh",
        };
        write!(f, "{s}")
    }
}

/// A persisted session or refresh token. Rows are never updated after insert.
#[derive(Debug, Clone, FromRow)]
pub struct Token {
    pub id: i64,
    pub user_id: i64,
    pub value: String,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Token {
    /// A token whose expiry is at or before `now` is no longer valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Row values computed before insertion.
#[derive(Debug, Clone)]
pub struct NewToken {
    pub user_id: i64,
    pub value: String,
    pub expired_at: DateTime<Utc>,
}

impl NewToken {
    /// Draws a fresh value and sets `expired_at = now + validity`.
    pub fn mint(user_id: i64, validity: Duration) -> Result<Self, AuthError> {
        let expired_at = Utc::now()
            .checked_add_signed(validity)
            .ok_or_else(|| AuthError::Validation(format!("token validity {validity} out of range")))?;

        Ok(Self {
            user_id,
            value: generate_token()?,
            expired_at,
        })
    }
}
