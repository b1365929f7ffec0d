/**
 * Realtime Wire Events
 *
 * JSON events exchanged with connected sessions over WebSocket text
 * frames. Events are tagged by a `type` field using the wire names
 * (`join-room`, `edit`, `cursor-move`, `document-updated`,
 * `cursor-moved`, `error`).
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cursor position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub x: f64,
    pub y: f64,
}

/// Events received from a connected session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join the room for a document
    JoinRoom { document_id: Uuid },
    /// Propose new content for a document
    Edit { document_id: Uuid, content: String },
    /// Announce a cursor position to the room
    CursorMove {
        document_id: Uuid,
        position: CursorPosition,
    },
}

/// Events sent to a connected session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Another room member changed the document
    DocumentUpdated { document_id: Uuid, content: String },
    /// Another room member moved their cursor
    CursorMoved {
        document_id: Uuid,
        identity: String,
        position: CursorPosition,
    },
    /// Something about the session's last request failed
    Error { message: String },
}
