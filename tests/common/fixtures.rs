//! Application state and session fixtures
//!
//! Everything here runs without live services: the database pool is
//! lazily created and never connected (queries against it fail, which
//! is exactly what the dependency-failure scenarios need), and the
//! fast store is whichever backend the test supplies.

use std::sync::Arc;
use std::time::Duration;

use sketchsync::cache::{FastStore, MemoryStore};
use sketchsync::collab::{RoomRegistry, ServerEvent, Session};
use sketchsync::server::state::AppState;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

/// A pool pointing at nothing; queries fail with a connection error.
///
/// The acquire timeout is kept short so dependency-failure scenarios
/// observe the connection error promptly rather than waiting out the
/// default 30s pool timeout.
pub fn unreachable_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy("postgres://localhost:1/unreachable")
        .unwrap()
}

/// App state over the given fast store and an unreachable database.
pub fn app_state_with_store(store: Arc<dyn FastStore>) -> AppState {
    AppState::new(unreachable_pool(), store)
}

/// App state over an in-memory fast store.
pub fn app_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (app_state_with_store(store.clone()), store)
}

/// Register a session with an mpsc-backed connection.
pub fn connected_session(
    registry: &RoomRegistry,
    identity: &str,
) -> (Arc<Session>, UnboundedReceiver<ServerEvent>) {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let session = Arc::new(Session::new(identity.to_string(), tx));
    registry.register(session.clone());
    (session, rx)
}

/// A fresh UUID identity string.
pub fn identity() -> String {
    Uuid::new_v4().to_string()
}

/// Drain every queued event from a session's receiver.
pub fn drain(rx: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
