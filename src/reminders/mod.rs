//! Reminder tracking: store, periodic scan, and notification dispatch.
//!
//! ## Contents
//! - [`ReminderStore`], [`ReminderRecord`] last-write-wins pending reminders
//! - [`ReminderScanner`] the `scan_and_notify` entry point a host timer fires
//! - [`NotificationDispatcher`] reacts to reminder lifecycle events
//!
//! ## Quick reference
//! - **Writers**: the `reminders` handler ([`crate::service`]) on
//!   `reminder_set`; the scanner drains due records.
//! - **Re-fire policy**: delete-on-trigger — a record is removed from the
//!   store in the same operation that selects it, so consecutive (or
//!   double-fired) scans never notify the same reminder twice.

mod dispatcher;
mod scanner;
mod store;

pub use dispatcher::NotificationDispatcher;
pub use scanner::ReminderScanner;
pub use store::{ReminderRecord, ReminderStore};
