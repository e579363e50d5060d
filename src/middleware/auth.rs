use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db::TokenStore, error::AuthError, models::auth::AuthenticatedUser,
    services::token_generator::is_token_shaped, AppState,
};

/// Why a request was turned away by the gate. Every variant answers 403.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateRejection {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("unknown session token")]
    UnknownToken,

    #[error("expired session token")]
    ExpiredToken,

    #[error("session lookup failed: {0}")]
    LookupFailed(String),
}

/// Pulls the token out of `Authorization: <scheme> <token>`.
///
/// The header must split on single spaces into exactly two parts. The scheme is
/// not checked.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let value = match headers.get(AUTHORIZATION) {
        Some(v) if !v.is_empty() => v,
        _ => return Err(GateRejection::MissingHeader),
    };
    let header = value.to_str().map_err(|_| GateRejection::MalformedHeader)?;

    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        [_scheme, token] => Ok(*token),
        _ => Err(GateRejection::MalformedHeader),
    }
}

/// Resolves the bearer token against the session store as of `now`.
pub async fn authenticate(
    headers: &HeaderMap,
    sessions: &dyn TokenStore,
    now: DateTime<Utc>,
) -> Result<AuthenticatedUser, GateRejection> {
    let value = extract_bearer_token(headers)?;
    if !is_token_shaped(value) {
        return Err(GateRejection::UnknownToken);
    }

    let token = sessions.find_by_value(value).await.map_err(|e| match e {
        AuthError::NotFound(_) => GateRejection::UnknownToken,
        other => GateRejection::LookupFailed(other.to_string()),
    })?;

    if token.is_expired_at(now) {
        return Err(GateRejection::ExpiredToken);
    }

    Ok(AuthenticatedUser {
        user_id: token.user_id,
    })
}

/// Route layer guarding protected endpoints.
///
/// On success the resolved [`AuthenticatedUser`] is attached to the request
/// extensions. Every request does a fresh lookup.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = authenticate(request.headers(), state.sessions.as_ref(), Utc::now())
        .await
        .map_err(|rejection| {
            match &rejection {
                GateRejection::LookupFailed(_) => tracing::error!("Rejected request: {}", rejection),
                _ => tracing::warn!("Rejected request: {}", rejection),
            }
            StatusCode::FORBIDDEN
        })?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                StatusCode::FORBIDDEN
            })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Duration;

    use super::*;
    use crate::{
        db::memory::MemoryTokenStore,
        models::token::{NewToken, Token, TokenKind},
    };

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_rejects_missing_and_empty() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(GateRejection::MissingHeader)
        );
        assert_eq!(
            extract_bearer_token(&headers("")),
            Err(GateRejection::MissingHeader)
        );
    }

    #[test]
    fn test_extract_rejects_wrong_shapes() {
        for value in ["abc123", "Bearer  abc123", "Bearer abc 123", " abc123 "] {
            assert_eq!(
                extract_bearer_token(&headers(value)),
                Err(GateRejection::MalformedHeader),
                "{value:?}"
            );
        }
    }

    #[test]
    fn test_extract_ignores_scheme() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc123")), Ok("abc123"));
        assert_eq!(extract_bearer_token(&headers("Token abc123")), Ok("abc123"));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let sessions = MemoryTokenStore::new(TokenKind::Session);
        let result = authenticate(&headers("Bearer nope"), &sessions, Utc::now()).await;
        assert_eq!(result, Err(GateRejection::UnknownToken));
    }

    #[tokio::test]
    async fn test_authenticate_storage_failure_rejects() {
        struct OfflineStore;

        #[async_trait::async_trait]
        impl TokenStore for OfflineStore {
            async fn insert(&self, _new: NewToken) -> Result<Token, AuthError> {
                Err(AuthError::Storage("pool timed out".into()))
            }

            async fn find_by_value(&self, _value: &str) -> Result<Token, AuthError> {
                Err(AuthError::Storage("pool timed out".into()))
            }
        }

        let result = authenticate(
            &headers(&format!("Bearer {}", "c".repeat(64))),
            &OfflineStore,
            Utc::now(),
        )
        .await;

        assert!(matches!(result, Err(GateRejection::LookupFailed(_))));
    }

    #[tokio::test]
    async fn test_authenticate_expired_token() {
        let sessions = MemoryTokenStore::new(TokenKind::Session);
        let token = sessions
            .create_for_user(5, Duration::minutes(-1))
            .await
            .unwrap();

        let result = authenticate(
            &headers(&format!("Bearer {}", token.value)),
            &sessions,
            Utc::now(),
        )
        .await;

        assert_eq!(result, Err(GateRejection::ExpiredToken));
    }

    #[tokio::test]
    async fn test_authenticate_expires_exactly_at_deadline() {
        let sessions = MemoryTokenStore::new(TokenKind::Session);
        let token = sessions.create_for_user(5, Duration::minutes(15)).await.unwrap();
        let auth = headers(&format!("Bearer {}", token.value));

        assert!(authenticate(&auth, &sessions, token.expired_at - Duration::seconds(1))
            .await
            .is_ok());
        assert_eq!(
            authenticate(&auth, &sessions, token.expired_at).await,
            Err(GateRejection::ExpiredToken)
        );
    }

    #[tokio::test]
    async fn test_authenticate_binds_user() {
        let sessions = MemoryTokenStore::new(TokenKind::Session);
        let token = sessions.create_for_user(5, Duration::minutes(15)).await.unwrap();

        let user = authenticate(
            &headers(&format!("Bearer {}", token.value)),
            &sessions,
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(user, AuthenticatedUser { user_id: 5 });
    }
}
