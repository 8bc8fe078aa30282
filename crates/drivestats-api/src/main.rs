//! DriveStats API Server

use anyhow::Context;
use drivestats_api::{create_router, state::{connect_pool, AppState}};
use drivestats_core::{AppConfig, LoggingConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; variables may come from the environment
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    let pool = connect_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed");

    let addr = config.bind_address();

    // Create application state
    let state = Arc::new(AppState::new(config, pool));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("DriveStats API starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
