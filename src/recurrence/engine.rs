//! # RecurrenceEngine: completion events into create-task commands.
//!
//! On a `task_completed` event with an active recurrence pattern the engine
//! builds a [`RecurrenceCommand`] carrying the same title/priority/tags and
//! the freshly computed due date, and issues it once against the owning
//! task service.
//!
//! ## Failure posture
//! The remote creation is **at-most-once**: a failed invoke is logged and
//! not retried, the completed task is not rolled back, and no compensating
//! action is taken. The next occurrence simply does not appear.
//!
//! ## Defaults
//! Completion events do not carry the full task snapshot; missing fields
//! take the task service's own defaults (`"Recurring Task"`, medium
//! priority, no tags) so the created occurrence stays consistent with what
//! a bare create request would produce.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::RelayError;
use crate::events::{RecurrenceCommand, RecurrencePattern, TaskEvent, TaskEventKind};
use crate::recurrence::{format_due_date, next_due_date, parse_due_date};

/// Title used when a completion event does not carry one.
const DEFAULT_TITLE: &str = "Recurring Task";

/// # Remote create-task seam.
///
/// The engine talks to the owning task service only through this trait, so
/// tests can record invocations instead of crossing the network.
#[async_trait]
pub trait TaskServiceClient: Send + Sync + 'static {
    /// Creates one task for `user_id` from the given command.
    async fn create_task(&self, user_id: &str, command: &RecurrenceCommand)
        -> Result<(), RelayError>;
}

/// HTTP implementation of [`TaskServiceClient`] addressing the task service
/// through the sidecar's service-invocation route.
pub struct HttpTaskServiceClient {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    timeout: Duration,
}

impl HttpTaskServiceClient {
    /// Creates a client from the given config.
    ///
    /// The invoke timeout is also applied per request, so the bound holds
    /// even when the builder falls back to a default client.
    pub fn new(cfg: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(cfg.invoke_timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!("invoke client builder failed, using default client: {err}");
                reqwest::Client::default()
            });
        Self {
            client,
            base_url: cfg.bus_base_url.clone(),
            app_id: cfg.task_service_app_id.clone(),
            timeout: cfg.invoke_timeout,
        }
    }

    fn invoke_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1.0/invoke/{}/method/api/{user_id}/tasks",
            self.base_url, self.app_id
        )
    }
}

#[async_trait]
impl TaskServiceClient for HttpTaskServiceClient {
    async fn create_task(
        &self,
        user_id: &str,
        command: &RecurrenceCommand,
    ) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.invoke_url(user_id))
            .timeout(self.timeout)
            .json(command)
            .send()
            .await
            .map_err(|source| RelayError::Invoke {
                user_id: user_id.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RelayError::InvokeRejected {
                user_id: user_id.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

/// Reacts to task lifecycle events and issues follow-up creations.
pub struct RecurrenceEngine {
    client: Arc<dyn TaskServiceClient>,
}

impl RecurrenceEngine {
    /// Creates an engine over the given task-service client.
    pub fn new(client: Arc<dyn TaskServiceClient>) -> Self {
        Self { client }
    }

    /// Handles one event from the `task-events` topic.
    ///
    /// Only `task_completed` with `recurrence_pattern != none` produces a
    /// remote creation; every other event is ignored. Returns true when a
    /// creation was attempted (successfully or not).
    pub async fn on_task_event(&self, event: &TaskEvent) -> bool {
        if event.kind != TaskEventKind::Completed {
            return false;
        }
        let pattern = event.recurrence_pattern.unwrap_or_default();
        if pattern.is_none() {
            return false;
        }

        info!(
            task_id = event.task_id,
            pattern = ?pattern,
            "recurring task completed, creating next occurrence"
        );
        let command = build_command(event, pattern);
        match self.client.create_task(&event.user_id, &command).await {
            Ok(()) => {
                info!(
                    user_id = %event.user_id,
                    next_due = command.due_date.as_deref().unwrap_or("-"),
                    "next occurrence created"
                );
            }
            Err(err) => {
                // At-most-once: no retry, no rollback of the completion.
                error!(
                    user_id = %event.user_id,
                    label = err.as_label(),
                    "create-task invoke failed: {}",
                    err.as_message()
                );
            }
        }
        true
    }
}

/// Builds the create-task command from a completed task's snapshot.
fn build_command(event: &TaskEvent, pattern: RecurrencePattern) -> RecurrenceCommand {
    let base = event.due_date.as_deref().map(|raw| parse_due_date(Some(raw)));
    let next = next_due_date(base, pattern);
    RecurrenceCommand {
        title: event
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        priority: event.priority.unwrap_or_default(),
        recurrence_pattern: pattern,
        due_date: next.map(format_due_date),
        tags: event.tags.clone(),
    }
}
