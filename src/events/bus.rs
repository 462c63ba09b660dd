//! Event bus client for publishing lifecycle events.
//!
//! [`EventBus`] is a thin wrapper around a [`reqwest::Client`] that posts
//! JSON payloads to named topics on the pub/sub sidecar.
//!
//! - [`EventBus::publish`] is fire-and-forget: failures are logged and
//!   swallowed (best-effort side effect, never part of the caller's result).
//! - [`EventBus::try_publish`] surfaces the error for callers and tests that
//!   want it.
//!
//! Every call is bounded by [`Config::publish_timeout`]; a timeout counts as
//! a delivery failure, not as a fault of the caller.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::error::RelayError;

/// Topic carrying the full task lifecycle stream.
pub const TASK_EVENTS_TOPIC: &str = "task-events";
/// Topic carrying the reduced stream fanned out to live UI clients.
pub const TASK_UPDATES_TOPIC: &str = "task-updates";
/// Topic carrying reminder lifecycle events.
pub const REMINDERS_TOPIC: &str = "reminders";

/// Best-effort publish client for the pub/sub sidecar.
///
/// Cloning is cheap; the inner HTTP client is shared.
#[derive(Clone)]
pub struct EventBus {
    client: reqwest::Client,
    base_url: String,
    pubsub_name: String,
    timeout: Duration,
}

impl EventBus {
    /// Creates a bus client from the given config.
    ///
    /// The publish timeout is also applied per request, so the bound holds
    /// even when the builder falls back to a default client.
    pub fn new(cfg: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(cfg.publish_timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!("bus client builder failed, using default client: {err}");
                reqwest::Client::default()
            });
        Self {
            client,
            base_url: cfg.bus_base_url.clone(),
            pubsub_name: cfg.pubsub_name.clone(),
            timeout: cfg.publish_timeout,
        }
    }

    /// Publishes a payload to a topic, swallowing any failure.
    ///
    /// Errors are logged with the topic and a stable label; the caller's own
    /// operation must succeed even when event delivery does not.
    pub async fn publish<T: Serialize>(&self, topic: &str, payload: &T) {
        if let Err(err) = self.try_publish(topic, payload).await {
            warn!(
                topic,
                label = err.as_label(),
                "event publish failed: {}",
                err.as_message()
            );
        }
    }

    /// Publishes a payload to a topic, returning the failure if any.
    pub async fn try_publish<T: Serialize>(&self, topic: &str, payload: &T) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.publish_url(topic))
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|source| RelayError::Publish {
                topic: topic.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RelayError::PublishRejected {
                topic: topic.to_string(),
                status: status.as_u16(),
            })
        }
    }

    fn publish_url(&self, topic: &str) -> String {
        format!("{}/v1.0/publish/{}/{topic}", self.base_url, self.pubsub_name)
    }
}
