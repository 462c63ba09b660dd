//! # Wire types for task, update, and reminder events.
//!
//! The [`TaskEventKind`] enum classifies lifecycle events across two
//! categories:
//! - **Mutation events**: created, updated, deleted
//! - **Completion events**: completed, uncompleted
//!
//! Every payload field beyond `{type, task_id, user_id}` is type-dependent
//! and optional; producers only attach what the mutation touched. Consumers
//! must therefore treat absence as "not carried", never as an error.
//!
//! ## Due dates stay strings
//! `due_date` is deliberately kept as a raw string on the wire. The
//! recurrence engine must treat an unparseable date as "now" rather than
//! rejecting the event, so parsing happens at the use site
//! ([`crate::recurrence::parse_due_date`]) with an explicit fallback.
//!
//! ## Envelopes
//! The bus may deliver payloads wrapped in an envelope (`{"data": {...}}`)
//! or bare. [`unwrap_envelope`] normalizes both forms before typed
//! deserialization.
//!
//! ## Example
//! ```rust
//! use taskrelay::events::{TaskEvent, TaskEventKind, RecurrencePattern};
//!
//! let ev: TaskEvent = serde_json::from_str(
//!     r#"{"type":"task_completed","task_id":7,"user_id":"u1","recurrence_pattern":"weekly"}"#,
//! ).unwrap();
//! assert_eq!(ev.kind, TaskEventKind::Completed);
//! assert_eq!(ev.recurrence_pattern, Some(RecurrencePattern::Weekly));
//! assert!(ev.due_date.is_none());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of task lifecycle events on the `task-events` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskEventKind {
    /// A new task record was created.
    #[serde(rename = "task_created")]
    Created,
    /// An existing task was mutated; `changes` lists the touched fields.
    #[serde(rename = "task_updated")]
    Updated,
    /// The task record was deleted.
    #[serde(rename = "task_deleted")]
    Deleted,
    /// The task was marked complete. Triggers the recurrence engine.
    #[serde(rename = "task_completed")]
    Completed,
    /// The task was marked incomplete again.
    #[serde(rename = "task_uncompleted")]
    Uncompleted,
}

/// Task recurrence pattern carried on lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    /// One-shot task; the recurrence engine must not produce a follow-up.
    #[default]
    None,
    /// Next occurrence exactly 24 hours later.
    Daily,
    /// Next occurrence exactly 7 days later.
    Weekly,
    /// Next occurrence on the same day-of-month next month (clamped).
    Monthly,
}

impl RecurrencePattern {
    /// True for [`RecurrencePattern::None`].
    #[inline]
    pub fn is_none(self) -> bool {
        matches!(self, RecurrencePattern::None)
    }
}

/// Task priority carried on lifecycle events and recurrence commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Immutable task lifecycle message, produced once per task mutation.
///
/// Consumed independently by each subscriber; there is no shared mutable
/// state across consumers. Which optional fields are set depends on
/// [`TaskEvent::kind`] — completion events, for instance, carry neither
/// `due_date` nor `priority`, and downstream consumers fall back to
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Event classification.
    #[serde(rename = "type")]
    pub kind: TaskEventKind,
    /// Identifier of the mutated task.
    pub task_id: i64,
    /// Owner of the mutated task.
    pub user_id: String,
    /// Task title, when the mutation carried it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Task priority, when the mutation carried it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Raw due date string; parse with [`crate::recurrence::parse_due_date`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Recurrence pattern, when the mutation carried it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<RecurrencePattern>,
    /// Task tags, when the mutation carried them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Completion flag, set on completion events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    /// Names of the fields an update touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<String>>,
}

/// Classification of reminder lifecycle events on the `reminders` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderEventKind {
    /// A due date was set or changed; the store upserts a record.
    #[serde(rename = "reminder_set")]
    Set,
    /// A stored reminder entered the scan window; the dispatcher notifies.
    #[serde(rename = "reminder_triggered")]
    Triggered,
}

/// Reminder lifecycle message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderEvent {
    /// Event classification.
    #[serde(rename = "type")]
    pub kind: ReminderEventKind,
    /// Task the reminder belongs to (store key).
    pub task_id: i64,
    /// Owner of the task.
    pub user_id: String,
    /// Task title shown in the notification.
    #[serde(default)]
    pub title: Option<String>,
    /// Raw due date string; unparseable dates are logged and skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Frame relayed to a user's live WebSocket connections.
///
/// Mirrors what the original update relay sends: the event type and task id
/// lifted to the top level, the full event payload under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessage {
    /// Event type (e.g. `task_completed`).
    #[serde(rename = "type")]
    pub kind: TaskEventKind,
    /// Identifier of the mutated task.
    pub task_id: i64,
    /// Full event payload as received from the bus.
    pub data: Value,
}

/// Derived, transient create-task request built from a completed task's
/// snapshot. Sent once to the owning task service; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceCommand {
    /// Title copied from the completed task.
    pub title: String,
    /// Priority copied from the completed task.
    pub priority: Priority,
    /// Pattern copied forward so the next occurrence recurs too.
    pub recurrence_pattern: RecurrencePattern,
    /// Freshly computed next due date (naive ISO-8601), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Tags copied from the completed task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Handler verdict returned to the bus for each delivered event.
///
/// - [`EventStatus::Success`] — the event was fully processed.
/// - [`EventStatus::Drop`] — processing failed in a way that must not be
///   retried (malformed payload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Success,
    Drop,
}

/// Normalizes a bus delivery to its inner payload.
///
/// Envelope-wrapped deliveries (`{"data": {...}}`) yield the inner object;
/// bare payloads are returned unchanged.
pub fn unwrap_envelope(mut value: Value) -> Value {
    if let Value::Object(ref mut map) = value {
        if let Some(inner) = map.remove("data") {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_event_kind_wire_names() {
        let ev = TaskEvent {
            kind: TaskEventKind::Completed,
            task_id: 1,
            user_id: "u".into(),
            title: None,
            priority: None,
            due_date: None,
            recurrence_pattern: None,
            tags: None,
            is_completed: None,
            changes: None,
        };
        let v = serde_json::to_value(&ev).unwrap();
        assert_eq!(v["type"], "task_completed");
        assert!(v.get("due_date").is_none(), "unset fields are omitted");
    }

    #[test]
    fn test_completion_event_without_optional_fields() {
        // Completion events omit due_date/priority/tags entirely.
        let ev: TaskEvent = serde_json::from_value(json!({
            "type": "task_completed",
            "task_id": 42,
            "user_id": "u1",
            "title": "Water plants",
            "is_completed": true,
            "recurrence_pattern": "daily"
        }))
        .unwrap();
        assert_eq!(ev.kind, TaskEventKind::Completed);
        assert_eq!(ev.recurrence_pattern, Some(RecurrencePattern::Daily));
        assert!(ev.due_date.is_none());
        assert!(ev.priority.is_none());
    }

    #[test]
    fn test_unwrap_envelope_wrapped_and_bare() {
        let inner = json!({"type": "reminder_set", "task_id": 1, "user_id": "u", "title": "t"});
        let wrapped = json!({"id": "evt-1", "data": inner.clone()});
        assert_eq!(unwrap_envelope(wrapped), inner);
        assert_eq!(unwrap_envelope(inner.clone()), inner);
    }

    #[test]
    fn test_event_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&EventStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(serde_json::to_string(&EventStatus::Drop).unwrap(), "\"DROP\"");
    }

    #[test]
    fn test_recurrence_pattern_default_is_none() {
        assert!(RecurrencePattern::default().is_none());
        let p: RecurrencePattern = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(p, RecurrencePattern::Monthly);
    }
}
