//! swift_server: REST server for the SWIFT code catalog.
//!
//! Configuration is read from the environment (and `.env`); see
//! `swift_server::config`.

use std::sync::Arc;

use anyhow::Context;
use swift_core::{SwiftCodeService, SwiftCodeServiceImpl};
use swift_server::{config::ServerConfig, open_store, router::build_router};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,swift_server=debug,tower_http=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    let store = open_store(&config).await?;
    let service: Arc<dyn SwiftCodeService> = Arc::new(SwiftCodeServiceImpl::new(store));
    let app = build_router(service);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!("swift_server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("swift_server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
