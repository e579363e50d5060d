use std::env;

use chrono::{Duration, Utc};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_seconds: u64,
    pub session_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.is_empty());

        let config = Self {
            database_url: get("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("Missing required env var: DATABASE_URL"))?,
            database_max_connections: get("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "20".into())
                .parse()?,
            database_acquire_timeout_seconds: get("DATABASE_ACQUIRE_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "5".into())
                .parse()?,
            session_token_ttl: ttl(
                "SESSION_TOKEN_TTL_SECONDS",
                get("SESSION_TOKEN_TTL_SECONDS").unwrap_or_else(|| "900".into()),
                Duration::try_seconds,
            )?,
            refresh_token_ttl: ttl(
                "REFRESH_TOKEN_TTL_DAYS",
                get("REFRESH_TOKEN_TTL_DAYS").unwrap_or_else(|| "30".into()),
                Duration::try_days,
            )?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: get("PORT").unwrap_or_else(|| "8080".into()).parse()?,
        };

        if config.refresh_token_ttl <= config.session_token_ttl {
            anyhow::bail!("REFRESH_TOKEN_TTL_DAYS must outlast SESSION_TOKEN_TTL_SECONDS");
        }

        Ok(config)
    }
}

/// Parses a positive lifetime that still yields a representable expiry when added to now.
fn ttl(key: &str, raw: String, unit: fn(i64) -> Option<Duration>) -> anyhow::Result<Duration> {
    let amount: i64 = raw
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid {key}={raw}: {e}"))?;
    if amount <= 0 {
        anyhow::bail!("{key} must be positive, got {amount}");
    }

    let duration = unit(amount).ok_or_else(|| anyhow::anyhow!("{key}={amount} is out of range"))?;
    if Utc::now().checked_add_signed(duration).is_none() {
        anyhow::bail!("{key}={amount} is out of range");
    }

    Ok(duration)
}
