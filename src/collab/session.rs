/**
 * Connection Sessions
 *
 * Per-connection state for the realtime gateway. A session exists only
 * after the handshake verified a token, so every session carries an
 * identity; the binding is immutable for the connection's lifetime.
 */

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::collab::events::ServerEvent;

/// State for a single authenticated WebSocket connection.
#[derive(Debug)]
pub struct Session {
    /// Unique session identifier
    pub id: Uuid,
    /// Authenticated user identity, bound at handshake time
    identity: String,
    /// Outbound event queue, drained by the connection's writer task
    outbound: mpsc::UnboundedSender<ServerEvent>,
}

impl Session {
    pub fn new(identity: String, outbound: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            outbound,
        }
    }

    /// The identity bound to this connection.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Queue an event for delivery to this session.
    ///
    /// Returns false when the connection is gone (writer task dropped
    /// the receiver); the caller treats that the same as a disconnect.
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbound.send(event).is_ok()
    }
}
