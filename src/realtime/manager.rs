//! # ConnectionManager: per-user fan-out with lazy pruning.
//!
//! Tracks live connections grouped by `user_id` and delivers one logical
//! message to all of a user's connections.
//!
//! ## What it guarantees
//! - Delivery is best-effort per connection; one dead connection never
//!   blocks or fails delivery to its siblings.
//! - Failed connections are detected lazily at send time and removed from
//!   the set as part of the same call (no separate health check).
//! - A user's entry is removed entirely when its set drains — no residual
//!   empty sets from users who disconnect.
//! - [`ConnectionManager::broadcast`] iterates a snapshot of user keys, so
//!   concurrent connect/disconnect cannot corrupt iteration.
//!
//! ## What it does **not** guarantee
//! - No delivery confirmation; a frame accepted by the transport may still
//!   be lost downstream.
//! - No cross-process view; one manager instance per service.
//!
//! ## Diagram
//! ```text
//!    send_to_user(user, msg)
//!        │        (snapshot of the user's set)
//!        ├──► conn 1 ─ ok
//!        ├──► conn 2 ─ ok
//!        └──► conn 3 ─ FAIL ──► pruned under the write lock
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::realtime::Connection;

type ConnectionSet = Vec<Arc<dyn Connection>>;

/// Thread-safe registry of live connections, keyed by user.
///
/// Shared mutable state is a single coarse lock around the map; fan-out
/// sends happen outside the lock on a snapshot of the user's set, so slow
/// peers never hold up registration.
#[derive(Default)]
pub struct ConnectionManager {
    connections: RwLock<HashMap<String, ConnectionSet>>,
}

impl ConnectionManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the user's set, creating the set if absent.
    ///
    /// There is no limit on connections per user.
    pub async fn register(&self, user_id: &str, conn: Arc<dyn Connection>) {
        let mut map = self.connections.write().await;
        map.entry(user_id.to_string()).or_default().push(conn);
        debug!(user_id, "connection registered");
    }

    /// Removes a connection from the user's set by handle identity.
    ///
    /// If the set becomes empty the user entry itself is removed.
    pub async fn unregister(&self, user_id: &str, conn: &Arc<dyn Connection>) {
        let mut map = self.connections.write().await;
        if let Some(set) = map.get_mut(user_id) {
            set.retain(|c| !Arc::ptr_eq(c, conn));
            if set.is_empty() {
                map.remove(user_id);
            }
        }
        debug!(user_id, "connection unregistered");
    }

    /// Delivers `text` to every connection currently in the user's set.
    ///
    /// Connections whose delivery fails are collected and removed as part of
    /// this call. Returns the number of successful deliveries.
    pub async fn send_to_user(&self, user_id: &str, text: &str) -> usize {
        let snapshot: ConnectionSet = {
            let map = self.connections.read().await;
            match map.get(user_id) {
                Some(set) => set.clone(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        let mut dead: ConnectionSet = Vec::new();
        for conn in &snapshot {
            match conn.send(text).await {
                Ok(()) => delivered += 1,
                Err(err) => {
                    debug!(user_id, label = err.as_label(), "pruning dead connection");
                    dead.push(Arc::clone(conn));
                }
            }
        }

        if !dead.is_empty() {
            let mut map = self.connections.write().await;
            if let Some(set) = map.get_mut(user_id) {
                set.retain(|c| !dead.iter().any(|d| Arc::ptr_eq(c, d)));
                if set.is_empty() {
                    map.remove(user_id);
                }
            }
        }
        delivered
    }

    /// Applies [`ConnectionManager::send_to_user`] to every known user.
    ///
    /// Iterates over a snapshot of user keys taken under the read lock.
    pub async fn broadcast(&self, text: &str) -> usize {
        let users: Vec<String> = {
            let map = self.connections.read().await;
            map.keys().cloned().collect()
        };

        let mut delivered = 0;
        for user_id in users {
            delivered += self.send_to_user(&user_id, text).await;
        }
        delivered
    }

    /// Number of connections currently tracked for one user.
    pub async fn user_connection_count(&self, user_id: &str) -> usize {
        self.connections
            .read()
            .await
            .get(user_id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Total number of connections across all users.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.values().map(Vec::len).sum()
    }

    /// Number of users with at least one live connection.
    pub async fn user_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectionError;
    use crate::realtime::ConnectionState;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    /// Records delivered frames; flips to failing on demand.
    struct FakeConnection {
        sent: Mutex<Vec<String>>,
        failing: AtomicBool,
    }

    impl FakeConnection {
        fn healthy() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                failing: AtomicBool::new(false),
            })
        }

        fn fail_from_now_on(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }

        async fn sent(&self) -> Vec<String> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Connection for FakeConnection {
        async fn send(&self, text: &str) -> Result<(), ConnectionError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ConnectionError::Transport {
                    reason: "peer gone".into(),
                });
            }
            self.sent.lock().await.push(text.to_string());
            Ok(())
        }

        fn state(&self) -> ConnectionState {
            ConnectionState::Open
        }
    }

    #[tokio::test]
    async fn test_send_to_user_delivers_to_all_connections() {
        let mgr = ConnectionManager::new();
        let a = FakeConnection::healthy();
        let b = FakeConnection::healthy();
        mgr.register("u1", a.clone()).await;
        mgr.register("u1", b.clone()).await;

        assert_eq!(mgr.send_to_user("u1", "hello").await, 2);
        assert_eq!(a.sent().await, vec!["hello"]);
        assert_eq!(b.sent().await, vec!["hello"]);
    }

    #[tokio::test]
    async fn test_failed_connection_is_pruned_in_same_call() {
        let mgr = ConnectionManager::new();
        let healthy = FakeConnection::healthy();
        let dying = FakeConnection::healthy();
        mgr.register("u1", healthy.clone()).await;
        mgr.register("u1", dying.clone()).await;

        dying.fail_from_now_on();
        assert_eq!(mgr.send_to_user("u1", "first").await, 1);
        assert_eq!(mgr.user_connection_count("u1").await, 1);

        // Subsequent delivery reaches only the surviving connection.
        assert_eq!(mgr.send_to_user("u1", "second").await, 1);
        assert_eq!(healthy.sent().await, vec!["first", "second"]);
        assert!(dying.sent().await.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_last_connection_removes_user_entry() {
        let mgr = ConnectionManager::new();
        let conn = FakeConnection::healthy();
        let handle: Arc<dyn Connection> = conn;
        mgr.register("u1", handle.clone()).await;
        assert_eq!(mgr.user_count().await, 1);

        mgr.unregister("u1", &handle).await;
        assert_eq!(mgr.user_count().await, 0, "no residual empty entry");
        assert_eq!(mgr.send_to_user("u1", "late").await, 0);
    }

    #[tokio::test]
    async fn test_all_connections_dead_removes_user_entry() {
        let mgr = ConnectionManager::new();
        let only = FakeConnection::healthy();
        mgr.register("u1", only.clone()).await;
        only.fail_from_now_on();

        assert_eq!(mgr.send_to_user("u1", "x").await, 0);
        assert_eq!(mgr.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_user() {
        let mgr = ConnectionManager::new();
        let a = FakeConnection::healthy();
        let b = FakeConnection::healthy();
        mgr.register("u1", a.clone()).await;
        mgr.register("u2", b.clone()).await;

        assert_eq!(mgr.broadcast("ping").await, 2);
        assert_eq!(a.sent().await, vec!["ping"]);
        assert_eq!(b.sent().await, vec!["ping"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_siblings() {
        let mgr = ConnectionManager::new();
        let dying = FakeConnection::healthy();
        let healthy = FakeConnection::healthy();
        dying.fail_from_now_on();
        mgr.register("u1", dying).await;
        mgr.register("u1", healthy.clone()).await;

        assert_eq!(mgr.send_to_user("u1", "msg").await, 1);
        assert_eq!(healthy.sent().await, vec!["msg"]);
    }
}
