use std::sync::Arc;

use crate::{
    db::{TokenStore, UserDirectory},
    error::AuthError,
    models::{auth::TokenPair, user::is_valid_device_uuid},
    services::{issuance::TokenIssuer, token_generator::is_token_shaped},
};

/// Device registration, sign-in and token refresh.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    refreshes: Arc<dyn TokenStore>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        refreshes: Arc<dyn TokenStore>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            users,
            refreshes,
            issuer,
        }
    }

    /// Creates a user for a new device and issues its first token pair.
    pub async fn register(&self, device_uuid: &str) -> Result<TokenPair, AuthError> {
        validate_device_uuid(device_uuid)?;

        let user = self.users.create_with_device_id(device_uuid).await?;
        tracing::info!("Registered device {} as user_id={}", device_uuid, user.id);

        self.issuer.issue_pair_for_user(user.id).await
    }

    /// Issues a token pair for an already registered device.
    pub async fn sign_in(&self, device_uuid: &str) -> Result<TokenPair, AuthError> {
        validate_device_uuid(device_uuid)?;

        let user = self.users.find_by_device_id(device_uuid).await?;
        self.issuer.issue_pair_for_user(user.id).await
    }

    /// Trades a live refresh token for a new pair.
    ///
    /// The presented refresh token is left untouched and stays usable until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        if !is_token_shaped(refresh_token) {
            return Err(AuthError::NotFound("refresh token"));
        }

        let stored = self.refreshes.find_by_value(refresh_token).await?;
        if stored.is_expired() {
            return Err(AuthError::Expired("refresh token"));
        }

        self.issuer.issue_pair_for_user(stored.user_id).await
    }
}

fn validate_device_uuid(device_uuid: &str) -> Result<(), AuthError> {
    if is_valid_device_uuid(device_uuid) {
        Ok(())
    } else {
        Err(AuthError::Validation(format!(
            "invalid device_uuid: {device_uuid:?}"
        )))
    }
}
