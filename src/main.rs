use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use device_auth_api::{config::Config, db, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let state = AppState::with_pool(
        pool,
        config.session_token_ttl,
        config.refresh_token_ttl,
    );
    info!(
        "Session tokens live {}s, refresh tokens {}d",
        config.session_token_ttl.num_seconds(),
        config.refresh_token_ttl.num_days()
    );

    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("device auth API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
