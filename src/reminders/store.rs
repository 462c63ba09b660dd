//! # Pending-reminder store with last-write-wins semantics.
//!
//! Maintains the authoritative map of pending reminders keyed by task id.
//!
//! ## Rules
//! - One record per `task_id`; an upsert **overwrites** whatever was there
//!   (last write wins, no optimistic concurrency check).
//! - Task completion does not remove a record; a stale reminder for a
//!   completed task may still fire once before the drain removes it.
//! - [`ReminderStore::take_due`] removes what it returns under the write
//!   lock, so two concurrent scans cannot both claim the same record.
//!
//! ## Architecture
//! ```text
//! reminders handler ──reminder_set──► ReminderStore::upsert()
//!                                            │
//! host timer ──► scan_and_notify() ──► ReminderStore::take_due()
//!                                            │
//!                                            ▼
//!                                 HashMap<i64, ReminderRecord>
//! ```

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// One pending reminder, keyed by the task it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderRecord {
    /// Task the reminder belongs to (store key, unique).
    pub task_id: i64,
    /// Owner of the task.
    pub user_id: String,
    /// Task title shown in the notification.
    pub title: String,
    /// When the task is due.
    pub due_date: DateTime<Utc>,
}

/// Thread-safe map of pending reminders.
///
/// Written by the reminder event handler, drained by the periodic scan; a
/// single coarse lock guards the map (correctness requirement is no lost
/// updates and no iteration-time mutation, not linearizability).
#[derive(Default)]
pub struct ReminderStore {
    entries: RwLock<HashMap<i64, ReminderRecord>>,
}

impl ReminderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the record for its task id (last write wins).
    pub async fn upsert(&self, record: ReminderRecord) {
        self.entries.write().await.insert(record.task_id, record);
    }

    /// Returns a copy of the record for a task, if present.
    pub async fn get(&self, task_id: i64) -> Option<ReminderRecord> {
        self.entries.read().await.get(&task_id).cloned()
    }

    /// Removes the record for a task, returning it if it was present.
    pub async fn remove(&self, task_id: i64) -> Option<ReminderRecord> {
        self.entries.write().await.remove(&task_id)
    }

    /// Number of pending reminders.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when no reminders are pending.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drains every record whose due date falls in `[now, now + window)`.
    ///
    /// Removal happens under the same write lock that selects the records,
    /// which is what makes the scan safe against a double-firing host timer:
    /// whichever invocation drains a record first is the only one to see it.
    pub async fn take_due(&self, now: DateTime<Utc>, window: Duration) -> Vec<ReminderRecord> {
        let until = now
            + chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::minutes(30));
        let mut entries = self.entries.write().await;
        let due_ids: Vec<i64> = entries
            .values()
            .filter(|r| r.due_date >= now && r.due_date < until)
            .map(|r| r.task_id)
            .collect();

        let mut due: Vec<ReminderRecord> = due_ids
            .into_iter()
            .filter_map(|id| entries.remove(&id))
            .collect();
        due.sort_by_key(|r| r.due_date);
        due
    }
}
