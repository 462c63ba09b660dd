//! Updates satellite host: WebSocket fan-out of `task-updates` events.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use taskrelay::realtime::ConnectionManager;
use taskrelay::service::{updates_router, wait_for_shutdown_signal, UpdatesState};
use taskrelay::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::from_env();
    let state = UpdatesState {
        manager: Arc::new(ConnectionManager::new()),
        pubsub_name: cfg.pubsub_name.clone(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8004".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(%port, "updates-service listening");

    axum::serve(listener, updates_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    Ok(())
}
