use std::sync::Arc;

use anyhow::Context;

use hrms_api::{app, config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hrms_observability::init();

    let config = AppConfig::from_env()?;
    tracing::info!(config = ?config, "configuration loaded");

    let services = Arc::new(app::services::build_services(&config)?);
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
