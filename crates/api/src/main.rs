use std::sync::Arc;

use anyhow::Context;

use restock_api::app::{build_app, services::AppServices};
use restock_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    restock_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; only the stateless endpoint is available");
    }

    let services = AppServices::from_config(config.clone())
        .await
        .context("failed to initialise services")?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
