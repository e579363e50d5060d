use thiserror::Error;

/// Failures raised by the directory, the token stores and the issuer.
///
/// The HTTP status is picked by each handler: the same variant can mean a client
/// fault on one route and a server fault on another.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} expired")]
    Expired(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("secure random source unavailable: {0}")]
    Entropy(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

/// Returns true when the database rejected a write because of a unique index.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}
