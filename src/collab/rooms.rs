/**
 * Room Registry
 *
 * Maps documents to the sessions currently collaborating on them and
 * relays events between room members. Rooms are in-memory and
 * process-local: they come into being on first join and are forgotten
 * when the last member leaves.
 *
 * # Indexing
 *
 * The registry keeps a double index (document -> session ids, session
 * -> joined document ids) behind one mutex, so disconnect cleanup is
 * proportional to the number of rooms the session joined and no
 * reference cycles exist between rooms and sessions.
 */

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::collab::events::{CursorPosition, ServerEvent};
use crate::collab::session::Session;
use crate::documents::Document;
use crate::error::AppError;

/// Registry of rooms and connected sessions.
///
/// Cross-process fan-out is an explicit extension point: a pub/sub
/// fabric would wrap `broadcast` and replay remote events into local
/// rooms.
#[derive(Default)]
pub struct RoomRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    /// document id -> sessions currently in the room
    rooms: HashMap<Uuid, HashSet<Uuid>>,
    /// session id -> session handle and joined rooms
    sessions: HashMap<Uuid, SessionEntry>,
}

struct SessionEntry {
    session: Arc<Session>,
    joined: HashSet<Uuid>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly connected session.
    pub fn register(&self, session: Arc<Session>) {
        let mut inner = self.inner.lock().unwrap();
        inner.sessions.insert(
            session.id,
            SessionEntry {
                session,
                joined: HashSet::new(),
            },
        );
    }

    /// Add a session to the room for `document_id`.
    ///
    /// Idempotent; joining twice is the same as joining once. Read
    /// access is implicit in receiving updates, so there is no
    /// permission check here.
    pub fn join(&self, session_id: Uuid, document_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.sessions.get_mut(&session_id) else {
            tracing::warn!("[Rooms] join from unregistered session {session_id}");
            return;
        };
        entry.joined.insert(document_id);
        inner.rooms.entry(document_id).or_default().insert(session_id);
        tracing::debug!("[Rooms] session {session_id} joined room {document_id}");
    }

    /// Remove a disconnected session from every room it joined.
    ///
    /// Rooms left empty are forgotten. After this call no further
    /// broadcast will target the session.
    pub fn leave_all(&self, session_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        let Some(entry) = inner.sessions.remove(&session_id) else {
            return;
        };
        for document_id in entry.joined {
            if let Some(members) = inner.rooms.get_mut(&document_id) {
                members.remove(&session_id);
                if members.is_empty() {
                    inner.rooms.remove(&document_id);
                }
            }
        }
        tracing::debug!("[Rooms] session {session_id} left all rooms");
    }

    /// Deliver an event to every room member except `sender`.
    ///
    /// Fire-and-forget: delivery failures mean the peer is already
    /// disconnecting and its own cleanup will run. Returns the number
    /// of sessions the event was queued for.
    pub fn broadcast(&self, document_id: Uuid, sender: Uuid, event: &ServerEvent) -> usize {
        let targets: Vec<Arc<Session>> = {
            let inner = self.inner.lock().unwrap();
            let Some(members) = inner.rooms.get(&document_id) else {
                return 0;
            };
            members
                .iter()
                .filter(|id| **id != sender)
                .filter_map(|id| inner.sessions.get(id))
                .map(|entry| entry.session.clone())
                .collect()
        };

        let mut delivered = 0;
        for session in targets {
            if session.send(event.clone()) {
                delivered += 1;
            } else {
                tracing::debug!("[Rooms] dropping event for closed session {}", session.id);
            }
        }
        delivered
    }

    /// Authorize and relay an edit to the sender's room.
    ///
    /// Allowed for the document owner or a write collaborator; anyone
    /// else gets a permission error and nothing is broadcast. The
    /// broadcast is not transactional with persistence, which happens
    /// on the separately invoked save path.
    pub fn relay_edit(
        &self,
        session: &Session,
        document: &Document,
        content: String,
    ) -> Result<usize, AppError> {
        if !document.can_edit(session.identity()) {
            return Err(AppError::permission_denied(
                "no write access to document",
            ));
        }

        let delivered = self.broadcast(
            document.id,
            session.id,
            &ServerEvent::DocumentUpdated {
                document_id: document.id,
                content,
            },
        );
        tracing::debug!(
            "[Rooms] edit on {} relayed to {delivered} peers",
            document.id
        );
        Ok(delivered)
    }

    /// Relay an ephemeral cursor event to the sender's room.
    ///
    /// No authorization: cursor presence is read-visibility only and
    /// mutates nothing.
    pub fn relay_cursor(
        &self,
        session: &Session,
        document_id: Uuid,
        position: CursorPosition,
    ) -> usize {
        self.broadcast(
            document_id,
            session.id,
            &ServerEvent::CursorMoved {
                document_id,
                identity: session.identity().to_string(),
                position,
            },
        )
    }

    /// Number of sessions currently in the room for `document_id`.
    pub fn member_count(&self, document_id: Uuid) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .get(&document_id)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    /// Whether the session is currently a member of the room.
    pub fn is_member(&self, session_id: Uuid, document_id: Uuid) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .rooms
            .get(&document_id)
            .map(|members| members.contains(&session_id))
            .unwrap_or(false)
    }
}
