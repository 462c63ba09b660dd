//! # taskrelay
//!
//! **Taskrelay** is the event-driven coordination subsystem of a
//! multi-service task tracker. The CRUD task service owns the records;
//! three satellite services react to its lifecycle events to provide live
//! UI updates, reminders, and automatic recurrence — without a shared
//! transaction.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────────┐
//!   │  task service    │  (external, owns records)
//!   │  publish on each │
//!   │  mutation        │
//!   └───────┬──────────┘
//!           ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Event bus (best-effort pub/sub, fire-and-forget publishes)     │
//! └──────┬───────────────────┬──────────────────────┬───────────────┘
//!   task-updates         reminders              task-events
//!        ▼                   ▼                      ▼
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────────┐
//! │ updates      │   │ reminders      │   │ recurring        │
//! │ satellite    │   │ satellite      │   │ satellite        │
//! │              │   │                │   │                  │
//! │ Connection   │   │ Notification   │   │ Recurrence       │
//! │ Manager      │   │ Dispatcher     │   │ Engine           │
//! │  │ fan-out   │   │  │ upsert      │   │  │ on completion │
//! │  ▼           │   │  ▼             │   │  ▼               │
//! │ ws clients   │   │ ReminderStore  │   │ create-task      │
//! │ (per user)   │   │  ▲ drain       │   │ invoke ──────────┼──► task service
//! └──────────────┘   │  │             │   └──────────────────┘
//!                    │ ReminderScanner│
//!                    │ (host timer ──►│
//!                    │  scan_and_     │
//!                    │  notify)       │
//!                    └────────────────┘
//! ```
//!
//! ### Failure posture
//! Nothing in this subsystem fails a caller synchronously:
//! - publishes are best-effort with a bounded timeout, logged and swallowed;
//! - malformed deliveries answer `DROP` and are never retried;
//! - the recurrence create is at-most-once with no rollback;
//! - a dead WebSocket connection is pruned lazily at send time without
//!   affecting its siblings.
//!
//! Every failure degrades to "the side effect did not happen", discoverable
//! only via the absence of a later notification or connection message.
//!
//! ## Features
//! | Area           | Description                                               | Key types                                       |
//! |----------------|-----------------------------------------------------------|-------------------------------------------------|
//! | **Contracts**  | Typed payloads for the three topics, SUCCESS/DROP verdict | [`TaskEvent`], [`ReminderEvent`], [`EventStatus`] |
//! | **Publish**    | Fire-and-forget bus client with bounded timeout           | [`EventBus`]                                    |
//! | **Fan-out**    | Per-user WebSocket sets with lazy pruning                 | [`ConnectionManager`], [`Connection`]           |
//! | **Recurrence** | Deterministic rollover + at-most-once follow-up creation  | [`RecurrenceEngine`], [`next_due_date`]         |
//! | **Reminders**  | Last-write-wins store, delete-on-trigger scan             | [`ReminderStore`], [`ReminderScanner`]          |
//! | **Services**   | axum routers for the three satellites                     | [`service`]                                     |
//!
//! ## Example
//! ```rust
//! use taskrelay::events::RecurrencePattern;
//! use taskrelay::recurrence::{format_due_date, next_due_date, parse_due_date};
//!
//! let due = parse_due_date(Some("2025-01-31T00:00:00"));
//! let next = next_due_date(Some(due), RecurrencePattern::Monthly).unwrap();
//! assert_eq!(format_due_date(next), "2025-02-28T00:00:00");
//! ```

mod config;
mod error;

pub mod events;
pub mod realtime;
pub mod recurrence;
pub mod reminders;
pub mod service;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{ConnectionError, RelayError};
pub use events::{EventBus, EventStatus, ReminderEvent, TaskEvent};
pub use realtime::{Connection, ConnectionManager};
pub use recurrence::{next_due_date, RecurrenceEngine};
pub use reminders::{ReminderScanner, ReminderStore};
