//! # Shared inbound-contract types.
//!
//! Every satellite answers the bus with the same two shapes: the
//! subscription descriptor list (`GET /dapr/subscribe`) and the per-event
//! [`StatusReply`] verdict. [`decode_event`] is the one decoding path all
//! handlers share, so malformed input degrades to `DROP` identically
//! everywhere.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::events::{unwrap_envelope, EventStatus};

/// One topic/route pair a satellite declares interest in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSubscription {
    /// Pub/sub component the topic lives on.
    pub pubsubname: String,
    /// Topic name.
    pub topic: String,
    /// Local route the bus should deliver the topic's events to.
    pub route: String,
}

impl TopicSubscription {
    /// Builds a descriptor for the conventional `/events/{topic}` route.
    pub fn for_topic(pubsub_name: &str, topic: &str) -> Self {
        Self {
            pubsubname: pubsub_name.to_string(),
            topic: topic.to_string(),
            route: format!("/events/{topic}"),
        }
    }
}

/// Per-event verdict returned to the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    /// `SUCCESS` or `DROP`.
    pub status: EventStatus,
}

impl StatusReply {
    /// The event was fully processed.
    pub fn success() -> Self {
        Self {
            status: EventStatus::Success,
        }
    }

    /// Processing failed in a way that must not be retried.
    pub fn drop_event() -> Self {
        Self {
            status: EventStatus::Drop,
        }
    }
}

/// Liveness payload for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// Name of the satellite service.
    pub service: String,
    /// Live connection count (updates service only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_connections: Option<usize>,
}

impl HealthStatus {
    /// Healthy payload for the named service.
    pub fn healthy(service: &str) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.to_string(),
            active_connections: None,
        }
    }
}

/// Decodes a raw delivery body into a typed event.
///
/// Tolerates both envelope-wrapped (`{"data": {...}}`) and bare payloads.
/// Any failure — invalid JSON, wrong shape — is returned to the caller,
/// which answers `DROP`.
pub fn decode_event<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    serde_json::from_value(unwrap_envelope(value))
}
