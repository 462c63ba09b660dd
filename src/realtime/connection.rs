//! # Connection seam and lifecycle states.
//!
//! `Connection` is the extension point the [`ConnectionManager`](crate::realtime::ConnectionManager)
//! fans out through. Production code uses [`WsConnection`](crate::realtime::WsConnection);
//! tests plug in recording fakes.
//!
//! ## Lifecycle
//! ```text
//! Connecting ──handshake──► Open ──send/read failure or close──► Closed
//! ```
//! - Transition to `Open` is what triggers `register` with the manager.
//! - Any read/write failure or explicit close transitions to `Closed` and
//!   triggers `unregister`.
//! - There is no `Closed → Open` transition; a reconnect creates a new
//!   connection instance.

use async_trait::async_trait;

use crate::error::ConnectionError;

/// Lifecycle state of a real-time connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport session initiated, handshake not finished.
    Connecting,
    /// Handshake done; the connection is registered and deliverable.
    Open,
    /// Terminal state. A closed connection never reopens.
    Closed,
}

/// # A single live real-time connection.
///
/// A `Connection` delivers one text frame at a time. Implementations must be
/// safe to call from concurrent fan-out paths; a failed send leaves the
/// connection in `Closed` and the manager prunes it lazily.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use taskrelay::realtime::{Connection, ConnectionState};
/// use taskrelay::ConnectionError;
///
/// struct Discard;
///
/// #[async_trait]
/// impl Connection for Discard {
///     async fn send(&self, _text: &str) -> Result<(), ConnectionError> { Ok(()) }
///     fn state(&self) -> ConnectionState { ConnectionState::Open }
/// }
/// ```
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Delivers one text frame to the peer.
    ///
    /// A failure is terminal for this connection: the caller treats it as a
    /// dead connection and removes it from the user's set.
    async fn send(&self, text: &str) -> Result<(), ConnectionError>;

    /// Returns the current lifecycle state.
    fn state(&self) -> ConnectionState;
}
