//! WebSocket gateway end-to-end tests
//!
//! Runs the real router on a loopback listener and drives it with
//! tokio-tungstenite clients. Cursor presence needs no document store,
//! so the full join/relay path runs against live sockets; edits hit
//! the unreachable pool and come back as error events to the sender.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use uuid::Uuid;

use sketchsync::auth::create_token;
use sketchsync::collab::{ClientEvent, CursorPosition, ServerEvent};
use sketchsync::routes::create_router;

use crate::common::{app_state, identity};

type WsClient = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn spawn_server() -> SocketAddr {
    let (state, _store) = app_state();
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr, identity: &str) -> WsClient {
    let token = create_token(identity).unwrap();
    let url = format!("ws://{addr}/ws?token={token}");
    let (client, _response) = tokio_tungstenite::connect_async(url).await.unwrap();
    client
}

async fn send_event(client: &mut WsClient, event: &ClientEvent) {
    let text = serde_json::to_string(event).unwrap();
    client.send(Message::text(text)).await.unwrap();
}

async fn next_event(client: &mut WsClient) -> ServerEvent {
    loop {
        let message = timeout(Duration::from_secs(2), client.next())
            .await
            .expect("timed out waiting for event")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_handshake_without_token_is_rejected() {
    let addr = spawn_server().await;
    let result = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_handshake_with_bad_token_is_rejected() {
    let addr = spawn_server().await;
    let result =
        tokio_tungstenite::connect_async(format!("ws://{addr}/ws?token=not.a.token")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_cursor_presence_flows_between_peers() {
    let addr = spawn_server().await;
    let doc_id = Uuid::new_v4();
    let mover_identity = identity();

    let mut mover = connect(addr, &mover_identity).await;
    let mut watcher = connect(addr, &identity()).await;

    send_event(&mut mover, &ClientEvent::JoinRoom { document_id: doc_id }).await;
    send_event(&mut watcher, &ClientEvent::JoinRoom { document_id: doc_id }).await;
    // Let both joins land before the first presence event.
    tokio::time::sleep(Duration::from_millis(200)).await;

    send_event(
        &mut mover,
        &ClientEvent::CursorMove {
            document_id: doc_id,
            position: CursorPosition { x: 4.0, y: 2.0 },
        },
    )
    .await;

    match next_event(&mut watcher).await {
        ServerEvent::CursorMoved {
            identity, position, ..
        } => {
            assert_eq!(identity, mover_identity);
            assert_eq!(position.x, 4.0);
            assert_eq!(position.y, 2.0);
        }
        other => panic!("expected cursor event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_frame_earns_an_error_event() {
    let addr = spawn_server().await;
    let mut client = connect(addr, &identity()).await;

    client.send(Message::text("this is not json")).await.unwrap();

    match next_event(&mut client).await {
        ServerEvent::Error { message } => assert_eq!(message, "malformed event"),
        other => panic!("expected error event, got {other:?}"),
    }

    // The connection survives the bad frame.
    send_event(
        &mut client,
        &ClientEvent::JoinRoom {
            document_id: Uuid::new_v4(),
        },
    )
    .await;
}

#[tokio::test]
async fn test_edit_failure_is_reported_to_sender_only() {
    let addr = spawn_server().await;
    let doc_id = Uuid::new_v4();

    let mut editor = connect(addr, &identity()).await;
    let mut peer = connect(addr, &identity()).await;

    send_event(&mut editor, &ClientEvent::JoinRoom { document_id: doc_id }).await;
    send_event(&mut peer, &ClientEvent::JoinRoom { document_id: doc_id }).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The document store is unreachable in this fixture, so the edit
    // fails to load its permission state.
    send_event(
        &mut editor,
        &ClientEvent::Edit {
            document_id: doc_id,
            content: "unpersistable".to_string(),
        },
    )
    .await;

    assert!(matches!(
        next_event(&mut editor).await,
        ServerEvent::Error { .. }
    ));

    // The peer saw nothing.
    let nothing = timeout(Duration::from_millis(300), peer.next()).await;
    assert!(nothing.is_err(), "peer should receive no event");
}
