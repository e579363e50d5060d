pub mod auth;
pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware::auth::require_session, AppState};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(auth::me))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/register", post(auth::register))
        .route("/sign_in", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
