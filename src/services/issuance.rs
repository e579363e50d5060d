use std::sync::Arc;

use chrono::Duration;

use crate::{db::TokenStore, error::AuthError, models::auth::TokenPair};

/// Mints session/refresh pairs.
///
/// The two inserts are not wrapped in a transaction. When the refresh insert
/// fails the session token is left behind, still valid, and the caller gets the error.
#[derive(Clone)]
pub struct TokenIssuer {
    sessions: Arc<dyn TokenStore>,
    refreshes: Arc<dyn TokenStore>,
    session_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        sessions: Arc<dyn TokenStore>,
        refreshes: Arc<dyn TokenStore>,
        session_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            refreshes,
            session_ttl,
            refresh_ttl,
        }
    }

    pub async fn issue_pair_for_user(&self, user_id: i64) -> Result<TokenPair, AuthError> {
        let session = self
            .sessions
            .create_for_user(user_id, self.session_ttl)
            .await?;
        let refresh = self
            .refreshes
            .create_for_user(user_id, self.refresh_ttl)
            .await?;

        tracing::debug!("Issued token pair for user_id={}", user_id);

        Ok(TokenPair { session, refresh })
    }
}
