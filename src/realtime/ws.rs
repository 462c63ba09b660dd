//! # WebSocket-backed connection.
//!
//! [`WsConnection`] wraps the sink half of an axum WebSocket behind a mutex
//! so concurrent fan-out paths can share it, and tracks the
//! `Connecting → Open → Closed` lifecycle with an atomic cell.
//!
//! The read half stays with the ws endpoint's receive loop; transport-level
//! disconnect observed there is the sole cancellation signal and must always
//! end in `unregister` (see [`crate::service`]).

use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use tokio::sync::Mutex;

use crate::error::ConnectionError;
use crate::realtime::{Connection, ConnectionState};

const CONNECTING: u8 = 0;
const OPEN: u8 = 1;
const CLOSED: u8 = 2;

/// Atomic lifecycle cell enforcing `Connecting → Open → Closed`.
///
/// `Closed` is terminal: [`Lifecycle::open`] refuses to resurrect a closed
/// connection, so a reconnect always means a new connection instance.
struct Lifecycle(AtomicU8);

impl Lifecycle {
    fn connecting() -> Self {
        Self(AtomicU8::new(CONNECTING))
    }

    /// Attempts `Connecting → Open`. Returns false if already closed.
    fn open(&self) -> bool {
        self.0
            .compare_exchange(CONNECTING, OPEN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Transitions to `Closed` from any state. Idempotent.
    fn close(&self) {
        self.0.store(CLOSED, Ordering::Release);
    }

    fn get(&self) -> ConnectionState {
        match self.0.load(Ordering::Acquire) {
            CONNECTING => ConnectionState::Connecting,
            OPEN => ConnectionState::Open,
            _ => ConnectionState::Closed,
        }
    }
}

/// A live WebSocket connection owned by the updates service.
///
/// Holds only the sink half; the ws endpoint keeps the stream half for its
/// receive loop. A send failure closes the connection permanently.
pub struct WsConnection {
    sink: Mutex<SplitSink<WebSocket, Message>>,
    state: Lifecycle,
}

impl WsConnection {
    /// Wraps a freshly split socket sink; the connection starts `Connecting`.
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
            state: Lifecycle::connecting(),
        }
    }

    /// Marks the handshake as finished (`Connecting → Open`).
    ///
    /// Returns false if the connection closed in the meantime; the caller
    /// must not register it in that case.
    pub fn open(&self) -> bool {
        self.state.open()
    }

    /// Closes the connection permanently. Idempotent.
    pub fn close(&self) {
        self.state.close();
    }
}

#[async_trait]
impl Connection for WsConnection {
    async fn send(&self, text: &str) -> Result<(), ConnectionError> {
        if self.state.get() != ConnectionState::Open {
            return Err(ConnectionError::Closed);
        }
        let mut sink = self.sink.lock().await;
        match sink.send(Message::Text(text.to_owned().into())).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.state.close();
                Err(ConnectionError::Transport {
                    reason: err.to_string(),
                })
            }
        }
    }

    fn state(&self) -> ConnectionState {
        self.state.get()
    }
}
