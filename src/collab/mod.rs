/**
 * Realtime Collaboration
 *
 * The realtime side of the server: authenticated WebSocket sessions
 * grouped into per-document rooms, relaying edits and ephemeral cursor
 * presence between connected peers.
 *
 * # Module Structure
 *
 * ```text
 * collab/
 * ├── events.rs  - wire protocol (client and server events)
 * ├── session.rs - one authenticated connection
 * ├── rooms.rs   - room registry and broadcast coordination
 * └── gateway.rs - WebSocket upgrade, handshake auth, event loop
 * ```
 *
 * # Scope
 *
 * Room membership is process-local. Sessions for one document that land
 * on different server processes will not see each other's edits; a
 * cross-process fan-out fabric would wrap `RoomRegistry::broadcast`
 * without touching the gateway.
 */

pub mod events;
pub mod gateway;
pub mod rooms;
pub mod session;

pub use events::{ClientEvent, CursorPosition, ServerEvent};
pub use rooms::RoomRegistry;
pub use session::Session;
