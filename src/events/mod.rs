//! Event contracts and the publish client.
//!
//! This module groups the wire **data model** for the three topics and the
//! [`EventBus`] client used to publish to them.
//!
//! ## Contents
//! - [`TaskEvent`], [`TaskEventKind`] task lifecycle payloads (`task-events`,
//!   `task-updates`)
//! - [`ReminderEvent`], [`ReminderEventKind`] reminder lifecycle payloads
//!   (`reminders`)
//! - [`UpdateMessage`] the frame relayed to live WebSocket clients
//! - [`RecurrenceCommand`] the transient create-task request body
//! - [`EventStatus`] the SUCCESS/DROP handler verdict
//! - [`EventBus`] fire-and-forget publish with a bounded timeout
//!
//! ## Quick reference
//! - **Publishers**: the CRUD task service (external) and
//!   [`ReminderScanner`](crate::reminders::ReminderScanner)
//!   (`reminder_triggered`).
//! - **Consumers**: the three satellite routers in [`crate::service`], one
//!   handler endpoint per subscribed topic.

mod bus;
mod event;

pub use bus::{EventBus, REMINDERS_TOPIC, TASK_EVENTS_TOPIC, TASK_UPDATES_TOPIC};
pub use event::{
    unwrap_envelope, EventStatus, Priority, RecurrenceCommand, RecurrencePattern, ReminderEvent,
    ReminderEventKind, TaskEvent, TaskEventKind, UpdateMessage,
};
