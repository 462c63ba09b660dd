//! # Recurring satellite: completion-driven follow-up creation.
//!
//! Hosts the [`RecurrenceEngine`](crate::recurrence::RecurrenceEngine):
//! relays `task-events` deliveries to it; only completion events with an
//! active pattern produce a remote creation, everything else is
//! acknowledged and ignored.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{debug, warn};

use crate::events::{TaskEvent, TASK_EVENTS_TOPIC};
use crate::recurrence::RecurrenceEngine;
use crate::service::{decode_event, HealthStatus, StatusReply, TopicSubscription};

/// Service name reported by the health endpoint.
const SERVICE_NAME: &str = "recurring-service";

/// Shared state of the recurring satellite.
#[derive(Clone)]
pub struct RecurringState {
    /// Turns completions into create-task commands.
    pub engine: Arc<RecurrenceEngine>,
    /// Pub/sub component name echoed in subscription descriptors.
    pub pubsub_name: String,
}

/// Builds the recurring satellite router.
pub fn recurring_router(state: RecurringState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dapr/subscribe", get(subscribe))
        .route("/events/task-events", post(handle_task_event))
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(SERVICE_NAME))
}

async fn subscribe(State(state): State<RecurringState>) -> Json<Vec<TopicSubscription>> {
    Json(vec![TopicSubscription::for_topic(
        &state.pubsub_name,
        TASK_EVENTS_TOPIC,
    )])
}

/// Processes one event from the `task-events` topic.
async fn handle_task_event(
    State(state): State<RecurringState>,
    body: Bytes,
) -> Json<StatusReply> {
    let event: TaskEvent = match decode_event(&body) {
        Ok(ev) => ev,
        Err(err) => {
            warn!("malformed task-events payload, dropping: {err}");
            return Json(StatusReply::drop_event());
        }
    };
    debug!(kind = ?event.kind, task_id = event.task_id, "task event received");
    state.engine.on_task_event(&event).await;
    Json(StatusReply::success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use crate::events::RecurrenceCommand;
    use crate::recurrence::TaskServiceClient;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    struct RecordingClient {
        calls: Mutex<Vec<RecurrenceCommand>>,
    }

    #[async_trait]
    impl TaskServiceClient for RecordingClient {
        async fn create_task(
            &self,
            _user_id: &str,
            command: &RecurrenceCommand,
        ) -> Result<(), RelayError> {
            self.calls.lock().await.push(command.clone());
            Ok(())
        }
    }

    fn fixture() -> (Router, Arc<RecordingClient>) {
        let client = Arc::new(RecordingClient {
            calls: Mutex::new(Vec::new()),
        });
        let state = RecurringState {
            engine: Arc::new(RecurrenceEngine::new(client.clone())),
            pubsub_name: "kafka-pubsub".to_string(),
        };
        (recurring_router(state), client)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_completion_with_pattern_invokes_creation() {
        let (router, client) = fixture();
        let payload = serde_json::json!({
            "type": "task_completed",
            "task_id": 3,
            "user_id": "u1",
            "title": "Standup notes",
            "recurrence_pattern": "daily",
            "due_date": "2025-06-01T09:00:00"
        });
        let response = router
            .oneshot(
                Request::post("/events/task-events")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "SUCCESS");

        let calls = client.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].due_date.as_deref(), Some("2025-06-02T09:00:00"));
    }

    #[tokio::test]
    async fn test_created_event_is_acknowledged_without_invocation() {
        let (router, client) = fixture();
        let payload = serde_json::json!({
            "type": "task_created",
            "task_id": 3,
            "user_id": "u1",
            "title": "New task",
            "recurrence_pattern": "weekly"
        });
        let response = router
            .oneshot(
                Request::post("/events/task-events")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "SUCCESS");
        assert!(client.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_task_event_returns_drop() {
        let (router, client) = fixture();
        let response = router
            .oneshot(
                Request::post("/events/task-events")
                    .header("content-type", "application/json")
                    .body(Body::from("][ nope"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "DROP");
        assert!(client.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_envelope_wrapped_delivery_is_unwrapped() {
        let (router, client) = fixture();
        let payload = serde_json::json!({
            "id": "evt-9",
            "data": {
                "type": "task_completed",
                "task_id": 3,
                "user_id": "u1",
                "recurrence_pattern": "weekly",
                "due_date": "2025-06-01T09:00:00"
            }
        });
        let response = router
            .oneshot(
                Request::post("/events/task-events")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "SUCCESS");
        assert_eq!(
            client.calls.lock().await[0].due_date.as_deref(),
            Some("2025-06-08T09:00:00")
        );
    }
}
