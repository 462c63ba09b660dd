//! Recurrence: pure date rollover plus the completion handler.
//!
//! ## Contents
//! - [`next_due_date`], [`parse_due_date`] deterministic rollover math
//! - [`RecurrenceEngine`] turns completion events into create-task commands
//! - [`TaskServiceClient`] the remote-invocation seam,
//!   [`HttpTaskServiceClient`] its HTTP implementation
//!
//! ## Quick reference
//! - **Driver**: the `task-events` handler ([`crate::service`]) on
//!   `task_completed` events.
//! - **Failure posture**: the remote create is at-most-once — logged on
//!   failure, never retried, no compensation against the completed task.

mod engine;
mod schedule;

pub use engine::{HttpTaskServiceClient, RecurrenceEngine, TaskServiceClient};
pub use schedule::{format_due_date, next_due_date, parse_due_date};
