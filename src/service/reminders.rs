//! # Reminders satellite: store relay and cron-driven scan.
//!
//! Hosts the [`ReminderStore`](crate::reminders::ReminderStore): relays
//! `reminders` events into persisted state via the dispatcher, and exposes
//! the `POST /reminder-cron` entry point an external timer fires.
//!
//! The timer is an external collaborator: the endpoint assumes nothing about
//! its reliability and tolerates double-firing (see
//! [`ReminderScanner`](crate::reminders::ReminderScanner)).

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::warn;

use crate::events::{ReminderEvent, REMINDERS_TOPIC};
use crate::reminders::{NotificationDispatcher, ReminderScanner};
use crate::service::{decode_event, HealthStatus, StatusReply, TopicSubscription};

/// Service name reported by the health endpoint.
const SERVICE_NAME: &str = "reminders-service";

/// Shared state of the reminders satellite.
#[derive(Clone)]
pub struct RemindersState {
    /// Routes reminder lifecycle events into the store.
    pub dispatcher: Arc<NotificationDispatcher>,
    /// Drains due reminders on cron invocations.
    pub scanner: Arc<ReminderScanner>,
    /// Pub/sub component name echoed in subscription descriptors.
    pub pubsub_name: String,
}

/// Builds the reminders satellite router.
pub fn reminders_router(state: RemindersState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dapr/subscribe", get(subscribe))
        .route("/events/reminders", post(handle_reminder))
        .route("/reminder-cron", post(reminder_cron))
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}

async fn subscribe(State(state): State<RemindersState>) -> Json<Vec<TopicSubscription>> {
    Json(vec![TopicSubscription::for_topic(
        &state.pubsub_name,
        REMINDERS_TOPIC,
    )])
}

/// Processes one event from the `reminders` topic.
async fn handle_reminder(
    State(state): State<RemindersState>,
    body: Bytes,
) -> Json<StatusReply> {
    let event: ReminderEvent = match decode_event(&body) {
        Ok(ev) => ev,
        Err(err) => {
            warn!("malformed reminders payload, dropping: {err}");
            return Json(StatusReply::drop_event());
        }
    };
    state.dispatcher.on_reminder_event(&event).await;
    Json(StatusReply::success())
}

/// Cron-invoked scan for reminders entering the look-ahead window.
async fn reminder_cron(State(state): State<RemindersState>) -> Json<serde_json::Value> {
    let triggered = state.scanner.scan_and_notify().await;
    Json(serde_json::json!({ "status": "checked", "triggered": triggered }))
}
