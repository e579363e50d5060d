// Library exports for the binary and tests
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;

use db::{PgTokenStore, PgUserDirectory, TokenStore, UserDirectory};
use models::token::TokenKind;
use services::{auth::AuthService, issuance::TokenIssuer};

/// Application state shared across all handlers.
///
/// Storage is injected; nothing here reaches for a global handle.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub sessions: Arc<dyn TokenStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        sessions: Arc<dyn TokenStore>,
        refreshes: Arc<dyn TokenStore>,
        session_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let issuer = TokenIssuer::new(sessions.clone(), refreshes.clone(), session_ttl, refresh_ttl);
        Self {
            auth: AuthService::new(users, refreshes, issuer),
            sessions,
        }
    }

    /// Wires every store to the same PostgreSQL pool.
    pub fn with_pool(pool: PgPool, session_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self::new(
            Arc::new(PgUserDirectory::new(pool.clone())),
            Arc::new(PgTokenStore::new(pool.clone(), TokenKind::Session)),
            Arc::new(PgTokenStore::new(pool, TokenKind::Refresh)),
            session_ttl,
            refresh_ttl,
        )
    }
}
