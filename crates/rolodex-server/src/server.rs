//! Server startup.

use rolodex_core::RolodexConfig;
use tokio::net::TcpListener;

use crate::routes::create_router;
use crate::state::AppState;
use crate::{db, seed};

/// Connect, ensure the schema, and serve until interrupted.
pub async fn serve(config: RolodexConfig) -> anyhow::Result<()> {
    let pool = db::connect(&config.database.url).await?;
    db::ensure_schema(&pool).await?;

    let state = AppState::new(&config, pool);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(address = %addr, "Starting Rolodex admin backend");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Seed the configured database with sample data.
pub async fn seed_database(config: RolodexConfig) -> anyhow::Result<()> {
    let pool = db::connect(&config.database.url).await?;
    db::ensure_schema(&pool).await?;
    seed::populate(&pool).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
