use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::Token;

/// Bound into request extensions by the authentication gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

// Request/Response DTOs
// TODO: accept email + password once credential sign-up exists
#[derive(Debug, Deserialize)]
pub struct DeviceCredentialsRequest {
    pub device_uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// A session/refresh pair minted together for one user.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub session: Token,
    pub refresh: Token,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub session_token: String,
    pub session_expired_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expired_at: DateTime<Utc>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            session_token: pair.session.value,
            session_expired_at: pair.session.expired_at,
            refresh_token: pair.refresh.value,
            refresh_expired_at: pair.refresh.expired_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: i64,
}
