//! # NotificationDispatcher: reminder lifecycle handler.
//!
//! Reacts to events on the `reminders` topic:
//! - `reminder_set` → write/overwrite the pending record (last write wins);
//! - `reminder_triggered` → perform the user-visible notification action.
//!
//! The dispatcher trusts triggered events: it does not re-check the due
//! date, since the scanner already applied the window when it drained the
//! record.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::events::{ReminderEvent, ReminderEventKind};
use crate::reminders::{ReminderRecord, ReminderStore};

/// Routes reminder lifecycle events into the store and the notification log.
pub struct NotificationDispatcher {
    store: Arc<ReminderStore>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over the given store.
    pub fn new(store: Arc<ReminderStore>) -> Self {
        Self { store }
    }

    /// Handles one event from the `reminders` topic.
    pub async fn on_reminder_event(&self, event: &ReminderEvent) {
        match event.kind {
            ReminderEventKind::Set => self.on_set(event).await,
            ReminderEventKind::Triggered => self.on_triggered(event),
        }
    }

    /// Stores the reminder for later scanning.
    ///
    /// An event without a usable due date is logged and skipped; there is
    /// nothing to schedule for it.
    async fn on_set(&self, event: &ReminderEvent) {
        let Some(due) = event.due_date.as_deref().and_then(parse_wire_date) else {
            warn!(
                task_id = event.task_id,
                raw = event.due_date.as_deref().unwrap_or("-"),
                "reminder_set without usable due date, skipping"
            );
            return;
        };

        let title = event
            .title
            .clone()
            .unwrap_or_else(|| "Untitled".to_string());
        info!(
            task_id = event.task_id,
            user_id = %event.user_id,
            due = %due,
            "reminder set for '{title}'"
        );
        self.store
            .upsert(ReminderRecord {
                task_id: event.task_id,
                user_id: event.user_id.clone(),
                title,
                due_date: due,
            })
            .await;
    }

    /// Emits the user-visible notification (structured log line).
    fn on_triggered(&self, event: &ReminderEvent) {
        info!(
            task_id = event.task_id,
            user_id = %event.user_id,
            "notification sent: task '{}' is due",
            event.title.as_deref().unwrap_or("Untitled")
        );
    }
}

/// Strict wire-date parse for stored reminders.
///
/// Unlike the recurrence fallback, an unparseable reminder date is *not*
/// replaced with "now" — that would fire the reminder immediately. It yields
/// `None` and the event is skipped.
fn parse_wire_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn set_event(task_id: i64, due: Option<&str>) -> ReminderEvent {
        ReminderEvent {
            kind: ReminderEventKind::Set,
            task_id,
            user_id: "u1".to_string(),
            title: Some("Water plants".to_string()),
            due_date: due.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_set_stores_record() {
        let store = Arc::new(ReminderStore::new());
        let dispatcher = NotificationDispatcher::new(store.clone());

        dispatcher
            .on_reminder_event(&set_event(42, Some("2025-06-01T12:00:00")))
            .await;

        let record = store.get(42).await.unwrap();
        assert_eq!(record.title, "Water plants");
        assert_eq!(
            record.due_date,
            Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_second_set_overwrites_first() {
        let store = Arc::new(ReminderStore::new());
        let dispatcher = NotificationDispatcher::new(store.clone());

        dispatcher
            .on_reminder_event(&set_event(42, Some("2025-06-01T12:00:00")))
            .await;
        dispatcher
            .on_reminder_event(&set_event(42, Some("2025-06-02T08:30:00")))
            .await;

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.get(42).await.unwrap().due_date,
            Utc.with_ymd_and_hms(2025, 6, 2, 8, 30, 0).unwrap(),
            "only the latest due date remains queryable"
        );
    }

    #[tokio::test]
    async fn test_set_without_due_date_is_skipped() {
        let store = Arc::new(ReminderStore::new());
        let dispatcher = NotificationDispatcher::new(store.clone());

        dispatcher.on_reminder_event(&set_event(42, None)).await;
        dispatcher
            .on_reminder_event(&set_event(43, Some("not a date")))
            .await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_triggered_does_not_touch_store() {
        let store = Arc::new(ReminderStore::new());
        let dispatcher = NotificationDispatcher::new(store.clone());
        dispatcher
            .on_reminder_event(&set_event(42, Some("2025-06-01T12:00:00")))
            .await;

        dispatcher
            .on_reminder_event(&ReminderEvent {
                kind: ReminderEventKind::Triggered,
                task_id: 42,
                user_id: "u1".to_string(),
                title: Some("Water plants".to_string()),
                due_date: None,
            })
            .await;
        assert_eq!(store.len().await, 1);
    }
}
