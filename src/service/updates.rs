//! # Updates satellite: live UI fan-out.
//!
//! Hosts the [`ConnectionManager`]: relays `task-updates` events to every
//! live WebSocket connection of the addressed user and serves the
//! `GET /ws/{user_id}` upgrade endpoint.
//!
//! ## Connection lifecycle
//! A successful upgrade transitions the connection `Connecting → Open` and
//! registers it. The receive loop echoes an acknowledgment per inbound text
//! frame; transport-level disconnect (or any read/write failure) ends the
//! loop and always runs cleanup — `Closed` plus `unregister` — regardless of
//! which error path got there first.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use tracing::{info, warn};

use crate::events::{unwrap_envelope, TaskEvent, UpdateMessage, TASK_UPDATES_TOPIC};
use crate::realtime::{Connection, ConnectionManager, WsConnection};
use crate::service::{HealthStatus, StatusReply, TopicSubscription};

/// Service name reported by the health endpoint.
const SERVICE_NAME: &str = "updates-service";

/// Shared state of the updates satellite.
#[derive(Clone)]
pub struct UpdatesState {
    /// Per-user connection registry.
    pub manager: Arc<ConnectionManager>,
    /// Pub/sub component name echoed in subscription descriptors.
    pub pubsub_name: String,
}

/// Builds the updates satellite router.
pub fn updates_router(state: UpdatesState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/dapr/subscribe", get(subscribe))
        .route("/events/task-updates", post(handle_task_update))
        .route("/ws/{user_id}", get(ws_endpoint))
        .with_state(state)
}

async fn health(State(state): State<UpdatesState>) -> Json<HealthStatus> {
    let mut status = HealthStatus::healthy(SERVICE_NAME);
    status.active_connections = Some(state.manager.connection_count().await);
    Json(status)
}

async fn subscribe(State(state): State<UpdatesState>) -> Json<Vec<TopicSubscription>> {
    Json(vec![TopicSubscription::for_topic(
        &state.pubsub_name,
        TASK_UPDATES_TOPIC,
    )])
}

/// Relays one `task-updates` event to the addressed user's connections.
async fn handle_task_update(
    State(state): State<UpdatesState>,
    body: Bytes,
) -> Json<StatusReply> {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(err) => {
            warn!("task-updates delivery is not JSON, dropping: {err}");
            return Json(StatusReply::drop_event());
        }
    };
    let data = unwrap_envelope(value);
    let event: TaskEvent = match serde_json::from_value(data.clone()) {
        Ok(ev) => ev,
        Err(err) => {
            warn!("malformed task-updates payload, dropping: {err}");
            return Json(StatusReply::drop_event());
        }
    };

    let message = UpdateMessage {
        kind: event.kind,
        task_id: event.task_id,
        data,
    };
    if let Ok(text) = serde_json::to_string(&message) {
        let delivered = state.manager.send_to_user(&event.user_id, &text).await;
        info!(
            user_id = %event.user_id,
            task_id = event.task_id,
            delivered,
            "task update relayed"
        );
    }
    Json(StatusReply::success())
}

/// Upgrades to a bidirectional stream scoped to one user.
async fn ws_endpoint(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<UpdatesState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| drive_connection(socket, user_id, state.manager))
}

/// Runs one connection from handshake to cleanup.
async fn drive_connection(socket: WebSocket, user_id: String, manager: Arc<ConnectionManager>) {
    let (sink, mut stream) = socket.split();
    let conn = Arc::new(WsConnection::new(sink));
    if !conn.open() {
        return;
    }
    let handle: Arc<dyn Connection> = conn.clone();
    manager.register(&user_id, Arc::clone(&handle)).await;
    let total = manager.connection_count().await;
    info!(user_id = %user_id, total, "client connected");

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                // Echo back as acknowledgment.
                let ack = serde_json::json!({ "type": "ack", "message": text.as_str() });
                if conn.send(&ack.to_string()).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        }
    }

    // Transport disconnect is the sole cancellation signal; cleanup must run
    // no matter which path ended the loop.
    conn.close();
    manager.unregister(&user_id, &handle).await;
    let total = manager.connection_count().await;
    info!(user_id = %user_id, total, "client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn router() -> Router {
        updates_router(UpdatesState {
            manager: Arc::new(ConnectionManager::new()),
            pubsub_name: "kafka-pubsub".to_string(),
        })
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_connection_count() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["status"], "healthy");
        assert_eq!(v["service"], "updates-service");
        assert_eq!(v["active_connections"], 0);
    }

    #[tokio::test]
    async fn test_subscribe_declares_task_updates() {
        let response = router()
            .oneshot(Request::get("/dapr/subscribe").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let v = body_json(response).await;
        assert_eq!(v[0]["topic"], "task-updates");
        assert_eq!(v[0]["route"], "/events/task-updates");
    }

    #[tokio::test]
    async fn test_valid_update_returns_success() {
        let payload = serde_json::json!({
            "type": "task_completed",
            "task_id": 5,
            "user_id": "u1",
            "is_completed": true
        });
        let response = router()
            .oneshot(
                Request::post("/events/task-updates")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let v = body_json(response).await;
        assert_eq!(v["status"], "SUCCESS");
    }

    #[tokio::test]
    async fn test_malformed_update_returns_drop() {
        let response = router()
            .oneshot(
                Request::post("/events/task-updates")
                    .header("content-type", "application/json")
                    .body(Body::from("{definitely not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["status"], "DROP");
    }

    #[tokio::test]
    async fn test_unknown_event_type_returns_drop() {
        let response = router()
            .oneshot(
                Request::post("/events/task-updates")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"task_exploded","task_id":1,"user_id":"u"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let v = body_json(response).await;
        assert_eq!(v["status"], "DROP");
    }
}
