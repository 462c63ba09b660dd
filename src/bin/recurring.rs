//! Recurring satellite host: completion-driven follow-up creation.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use taskrelay::recurrence::{HttpTaskServiceClient, RecurrenceEngine};
use taskrelay::service::{recurring_router, wait_for_shutdown_signal, RecurringState};
use taskrelay::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::from_env();
    let client = Arc::new(HttpTaskServiceClient::new(&cfg));
    let state = RecurringState {
        engine: Arc::new(RecurrenceEngine::new(client)),
        pubsub_name: cfg.pubsub_name.clone(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8003".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(%port, "recurring-service listening");

    axum::serve(listener, recurring_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    Ok(())
}
