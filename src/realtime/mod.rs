//! Real-time fan-out: connections and the per-user manager.
//!
//! This module multiplexes one logical per-user notification stream over N
//! physical WebSocket connections.
//!
//! ## Contents
//! - [`Connection`] the send seam the manager fans out through
//! - [`ConnectionState`] the `Connecting → Open → Closed` lifecycle
//! - [`WsConnection`] the axum WebSocket implementation
//! - [`ConnectionManager`] per-user sets with lazy dead-connection pruning
//!
//! ## Quick reference
//! - **Writers**: the `task-updates` handler ([`crate::service`]) via
//!   `send_to_user`; the ws endpoint via `register`/`unregister`.
//! - **Invariant**: a connection appears in at most one user's set; a user's
//!   entry is removed entirely once its set drains (no leak from users who
//!   disconnect).

mod connection;
mod manager;
mod ws;

pub use connection::{Connection, ConnectionState};
pub use manager::ConnectionManager;
pub use ws::WsConnection;
