//! Error types used by the coordination runtime.
//!
//! This module defines two main error enums:
//!
//! - [`RelayError`] — failures of outbound side effects (bus publish, remote
//!   task creation, payload encoding).
//! - [`ConnectionError`] — failures of a single real-time connection.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logging/metrics. None of these errors is ever surfaced to a user
//! synchronously: publishes swallow them, the recurrence engine logs them,
//! and the connection manager prunes the failing connection.

use thiserror::Error;

/// # Errors produced by outbound side effects.
///
/// These cover the two remote collaborators of the subsystem — the event bus
/// and the owning task service — plus payload encoding on the way out.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RelayError {
    /// Publish to a topic failed (unreachable bus, timeout, transport error).
    #[error("publish to '{topic}' failed: {source}")]
    Publish {
        /// Topic the payload was addressed to.
        topic: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The bus accepted the connection but answered with a non-success status.
    #[error("publish to '{topic}' rejected with status {status}")]
    PublishRejected {
        /// Topic the payload was addressed to.
        topic: String,
        /// HTTP status returned by the bus.
        status: u16,
    },

    /// The create-task invocation against the task service failed in transport.
    #[error("create-task invoke for user {user_id} failed: {source}")]
    Invoke {
        /// User the new task was addressed to.
        user_id: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The task service answered the create-task invocation with a non-success status.
    #[error("create-task invoke for user {user_id} rejected with status {status}")]
    InvokeRejected {
        /// User the new task was addressed to.
        user_id: String,
        /// HTTP status returned by the task service.
        status: u16,
    },

    /// Outbound payload could not be encoded as JSON.
    #[error("payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}

impl RelayError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskrelay::RelayError;
    ///
    /// let err = RelayError::PublishRejected { topic: "reminders".into(), status: 503 };
    /// assert_eq!(err.as_label(), "publish_rejected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RelayError::Publish { .. } => "publish_failed",
            RelayError::PublishRejected { .. } => "publish_rejected",
            RelayError::Invoke { .. } => "invoke_failed",
            RelayError::InvokeRejected { .. } => "invoke_rejected",
            RelayError::Payload(_) => "payload_encoding",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RelayError::Publish { topic, source } => {
                format!("topic={topic} transport error: {source}")
            }
            RelayError::PublishRejected { topic, status } => {
                format!("topic={topic} rejected: status={status}")
            }
            RelayError::Invoke { user_id, source } => {
                format!("user={user_id} transport error: {source}")
            }
            RelayError::InvokeRejected { user_id, status } => {
                format!("user={user_id} rejected: status={status}")
            }
            RelayError::Payload(err) => format!("encoding: {err}"),
        }
    }
}

/// # Errors produced by a single real-time connection.
///
/// A failing connection is removed from its user's set by the
/// [`ConnectionManager`](crate::realtime::ConnectionManager); the error never
/// propagates past the send call that observed it.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The connection already transitioned to `Closed`; no reopen is possible.
    #[error("connection closed")]
    Closed,

    /// The underlying transport failed mid-send.
    #[error("transport failure: {reason}")]
    Transport {
        /// Human-readable transport failure description.
        reason: String,
    },
}

impl ConnectionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectionError::Closed => "connection_closed",
            ConnectionError::Transport { .. } => "connection_transport",
        }
    }
}
