//! # Periodic reminder scan.
//!
//! [`ReminderScanner::scan_and_notify`] is the single entry point a host
//! timer fires. The timer itself is an external collaborator: the scan
//! assumes nothing about its reliability and is safe to invoke concurrently
//! with itself (a double-fired timer races on the store drain, and each
//! record is claimed by exactly one invocation).
//!
//! For every record due in `[now, now + window)` the scanner publishes one
//! `reminder_triggered` event on the `reminders` topic. Publishing is
//! best-effort: the record is already removed when the publish happens, so a
//! failed publish loses that notification rather than duplicating it later.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::events::{EventBus, ReminderEvent, ReminderEventKind, REMINDERS_TOPIC};
use crate::recurrence::format_due_date;
use crate::reminders::ReminderStore;

/// Drains due reminders and publishes `reminder_triggered` events.
pub struct ReminderScanner {
    store: Arc<ReminderStore>,
    bus: EventBus,
    window: Duration,
}

impl ReminderScanner {
    /// Creates a scanner over the given store and bus.
    pub fn new(store: Arc<ReminderStore>, bus: EventBus, cfg: &Config) -> Self {
        Self {
            store,
            bus,
            window: cfg.reminder_window,
        }
    }

    /// Runs one scan pass; returns the number of reminders triggered.
    ///
    /// Window: `[now, now + window)`. Records are removed from the store
    /// before their event is published (delete-on-trigger), so consecutive
    /// firings never notify the same reminder twice.
    pub async fn scan_and_notify(&self) -> usize {
        let now = Utc::now();
        info!(window_secs = self.window.as_secs(), "checking for upcoming reminders");

        let due = self.store.take_due(now, self.window).await;
        for record in &due {
            let event = ReminderEvent {
                kind: ReminderEventKind::Triggered,
                task_id: record.task_id,
                user_id: record.user_id.clone(),
                title: Some(record.title.clone()),
                due_date: Some(format_due_date(record.due_date)),
            };
            self.bus.publish(REMINDERS_TOPIC, &event).await;
        }

        if !due.is_empty() {
            info!(count = due.len(), "reminders triggered");
        }
        due.len()
    }
}
