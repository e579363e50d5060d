use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AuthError,
    models::auth::{
        AuthenticatedUser, DeviceCredentialsRequest, MeResponse, RefreshTokenRequest,
        TokenPairResponse,
    },
    AppState,
};

/// Unwraps a JSON body, answering 400 on anything axum could not decode.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, StatusCode> {
    payload.map(|Json(body)| body).map_err(|e| {
        tracing::warn!("Malformed request body: {}", e);
        StatusCode::BAD_REQUEST
    })
}

/// Logs the failure and reduces it to a bare status.
fn reject(route: &str, e: AuthError, status: StatusCode) -> StatusCode {
    if status.is_server_error() {
        tracing::error!("{}: {}", route, e);
    } else {
        tracing::warn!("{}: {}", route, e);
    }
    status
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<DeviceCredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, StatusCode> {
    let req = body(payload)?;

    state
        .auth
        .register(&req.device_uuid)
        .await
        .map(|pair| Json(pair.into()))
        .map_err(|e| {
            let status = match &e {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                // duplicate devices are not singled out
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            reject("register", e, status)
        })
}

pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<DeviceCredentialsRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, StatusCode> {
    let req = body(payload)?;

    state
        .auth
        .sign_in(&req.device_uuid)
        .await
        .map(|pair| Json(pair.into()))
        .map_err(|e| {
            let status = match &e {
                AuthError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            reject("sign_in", e, status)
        })
}

pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<TokenPairResponse>, StatusCode> {
    let req = body(payload)?;

    state
        .auth
        .refresh(&req.refresh_token)
        .await
        .map(|pair| Json(pair.into()))
        .map_err(|e| {
            let status = match &e {
                AuthError::NotFound(_) | AuthError::Expired(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            reject("refresh", e, status)
        })
}

pub async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
    })
}
