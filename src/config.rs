//! # Runtime configuration for the satellite services.
//!
//! Provides [`Config`] centralized settings shared by the event bus client,
//! the recurrence engine, and the reminder scanner.
//!
//! Config is used in two ways:
//! 1. **Library construction**: `EventBus::new(&config)`, `HttpTaskServiceClient::new(&config)`
//! 2. **Service hosts**: the binaries build it via [`Config::from_env`]
//!
//! ## Timeout semantics
//! Every outbound call (bus publish, remote task creation) is bounded by a
//! small timeout. A timeout is treated as a delivery failure, never as fatal
//! to the caller.

use std::time::Duration;

/// Settings for outbound bus/remote calls and the reminder scan window.
///
/// Defines:
/// - **Bus addressing**: sidecar base URL and pub/sub component name
/// - **Remote invocation**: app id of the owning task service
/// - **Timeouts**: bounds for publish and invoke calls
/// - **Reminders**: the look-ahead window scanned by `scan_and_notify`
///
/// All fields are public; prefer [`Config::from_env`] in service hosts so the
/// sidecar port can be overridden the same way across all three services.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the event-bus sidecar (e.g. `http://localhost:3500`).
    ///
    /// Publishes go to `{bus_base_url}/v1.0/publish/{pubsub_name}/{topic}`,
    /// remote invocations to `{bus_base_url}/v1.0/invoke/{app}/method/...`.
    pub bus_base_url: String,

    /// Name of the pub/sub component topics are published through.
    pub pubsub_name: String,

    /// App id of the task service that owns task records.
    ///
    /// The recurrence engine addresses its create-task invocation to this id.
    pub task_service_app_id: String,

    /// Upper bound for a single fire-and-forget publish call.
    pub publish_timeout: Duration,

    /// Upper bound for the synchronous create-task invocation.
    pub invoke_timeout: Duration,

    /// Look-ahead window for the periodic reminder scan.
    ///
    /// A scan enumerates reminders due in `[now, now + reminder_window)`.
    pub reminder_window: Duration,
}

impl Config {
    /// Builds a config from the environment, falling back to defaults.
    ///
    /// Reads `DAPR_HTTP_PORT` (default `3500`) to derive the sidecar base URL,
    /// matching how the task service addresses the same sidecar.
    pub fn from_env() -> Self {
        let port = std::env::var("DAPR_HTTP_PORT").unwrap_or_else(|_| "3500".to_string());
        Self {
            bus_base_url: format!("http://localhost:{port}"),
            ..Self::default()
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_base_url = http://localhost:3500`
    /// - `pubsub_name = "kafka-pubsub"`
    /// - `task_service_app_id = "backend"`
    /// - `publish_timeout = 5s`, `invoke_timeout = 5s`
    /// - `reminder_window = 30min`
    fn default() -> Self {
        Self {
            bus_base_url: "http://localhost:3500".to_string(),
            pubsub_name: "kafka-pubsub".to_string(),
            task_service_app_id: "backend".to_string(),
            publish_timeout: Duration::from_secs(5),
            invoke_timeout: Duration::from_secs(5),
            reminder_window: Duration::from_secs(30 * 60),
        }
    }
}
