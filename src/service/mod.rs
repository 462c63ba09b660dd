//! Satellite service surfaces.
//!
//! Each satellite exposes the same inbound contract:
//! - `GET /health` — liveness probe with the service name
//! - `GET /dapr/subscribe` — subscription descriptors (topic/route pairs)
//! - `POST /events/<topic>` — one handler per subscribed topic, answering
//!   `SUCCESS` (fully processed) or `DROP` (malformed payload, do not retry)
//!
//! ## Contents
//! - [`updates_router`] — ConnectionManager host: relays `task-updates` to
//!   live WebSocket clients, serves `GET /ws/{user_id}`
//! - [`reminders_router`] — ReminderStore host: relays `reminders` events
//!   into the store, serves the cron-invoked `POST /reminder-cron`
//! - [`recurring_router`] — RecurrenceEngine host: relays `task-events`
//! - [`TopicSubscription`], [`StatusReply`], [`HealthStatus`] the shared
//!   contract types
//! - [`wait_for_shutdown_signal`] graceful-shutdown helper for the hosts

mod contract;
mod recurring;
mod reminders;
mod shutdown;
mod updates;

pub use contract::{decode_event, HealthStatus, StatusReply, TopicSubscription};
pub use recurring::{recurring_router, RecurringState};
pub use reminders::{reminders_router, RemindersState};
pub use shutdown::wait_for_shutdown_signal;
pub use updates::{updates_router, UpdatesState};
