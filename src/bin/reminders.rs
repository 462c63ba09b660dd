//! Reminders satellite host: reminder store plus cron-driven scan.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use taskrelay::reminders::{NotificationDispatcher, ReminderScanner};
use taskrelay::service::{reminders_router, wait_for_shutdown_signal, RemindersState};
use taskrelay::{Config, EventBus, ReminderStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::from_env();
    let store = Arc::new(ReminderStore::new());
    let state = RemindersState {
        dispatcher: Arc::new(NotificationDispatcher::new(store.clone())),
        scanner: Arc::new(ReminderScanner::new(store, EventBus::new(&cfg), &cfg)),
        pubsub_name: cfg.pubsub_name.clone(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "8002".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(%port, "reminders-service listening");

    axum::serve(listener, reminders_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    Ok(())
}
