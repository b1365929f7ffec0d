/**
 * WebSocket Gateway
 *
 * Accepts realtime connections, authenticates the handshake, and runs
 * the per-connection event loop.
 *
 * # Connection Lifecycle
 *
 * 1. Handshake arrives with a bearer token (Authorization header, or
 *    `?token=` query because browser WebSocket clients cannot set
 *    headers)
 * 2. The token is verified before the upgrade; a missing, invalid, or
 *    subject-less token rejects the connection with 401 and no socket
 *    is ever opened
 * 3. On success the verified identity is bound into the `Session` and
 *    the socket is split: a writer task drains the session's outbound
 *    queue while the read loop dispatches inbound events
 * 4. Disconnect (client close or transport error) removes the session
 *    from every room before the tasks wind down
 *
 * Downstream handlers trust the session identity unconditionally, so
 * the gateway force-closes any connection that would otherwise start
 * without one.
 */

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Query, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::auth::verify_identity;
use crate::collab::events::{ClientEvent, ServerEvent};
use crate::collab::session::Session;
use crate::documents;
use crate::error::AppError;
use crate::server::state::AppState;

/// Handle `GET /ws`: authenticate the handshake, then upgrade.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let token = handshake_token(&headers, &params).ok_or_else(|| {
        tracing::warn!("[Gateway] handshake without token");
        AppError::MissingToken
    })?;

    let identity = verify_identity(&token)?;

    tracing::info!("[Gateway] handshake verified for {identity}");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, identity, state)))
}

/// Pull the bearer token out of the handshake.
fn handshake_token(headers: &HeaderMap, params: &HashMap<String, String>) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }
    params.get("token").cloned()
}

/// Per-connection event loop.
async fn handle_socket(mut socket: WebSocket, identity: String, state: AppState) {
    // The handshake cannot produce an empty identity, but nothing past
    // this point re-checks it, so drop the connection rather than run
    // a session without one.
    if identity.is_empty() {
        tracing::error!("[Gateway] refusing connection without bound identity");
        let _ = socket.close().await;
        return;
    }

    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let session = Arc::new(Session::new(identity, outbound_tx));
    state.rooms.register(session.clone());

    tracing::info!(
        "[Gateway] session {} connected for {}",
        session.id,
        session.identity()
    );

    // Writer task: drain the outbound queue into the socket. Ends when
    // the queue closes (disconnect) or the peer stops reading.
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!("[Gateway] failed to encode event: {e}");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Read loop: dispatch inbound events until the peer goes away.
    while let Some(Ok(message)) = ws_rx.next().await {
        match message {
            Message::Text(text) => {
                handle_client_event(&state, &session, text.as_str()).await;
            }
            Message::Close(_) => break,
            // Pings are answered by axum; binary frames are not part
            // of the protocol.
            _ => {}
        }
    }

    state.rooms.leave_all(session.id);
    writer.abort();
    tracing::info!("[Gateway] session {} disconnected", session.id);
}

/// Dispatch one inbound frame.
///
/// Malformed frames earn the sender an error event, never a
/// disconnect; a flaky client script should not lose its session.
async fn handle_client_event(state: &AppState, session: &Arc<Session>, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("[Gateway] malformed event from {}: {e}", session.id);
            session.send(ServerEvent::Error {
                message: "malformed event".to_string(),
            });
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom { document_id } => {
            state.rooms.join(session.id, document_id);
        }
        ClientEvent::Edit {
            document_id,
            content,
        } => {
            apply_edit(state, session, document_id, content).await;
        }
        ClientEvent::CursorMove {
            document_id,
            position,
        } => {
            state.rooms.relay_cursor(session, document_id, position);
        }
    }
}

/// Authorize and relay one edit.
///
/// Permission state is loaded fresh from the document store on every
/// edit, so revoked access takes effect on the next attempt. Failures
/// of any kind are reported to the requesting session only; other room
/// members never observe a rejected edit.
async fn apply_edit(
    state: &AppState,
    session: &Arc<Session>,
    document_id: uuid::Uuid,
    content: String,
) {
    let document = match documents::db::find_document(&state.db_pool, document_id).await {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!("[Gateway] edit on {document_id} failed to load: {e}");
            session.send(ServerEvent::Error {
                message: e.message(),
            });
            return;
        }
    };

    if let Err(e) = state
        .rooms
        .relay_edit(session, &document, content)
    {
        session.send(ServerEvent::Error {
            message: e.message(),
        });
    }
}
