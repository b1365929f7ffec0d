//! Room coordination integration tests
//!
//! Scenarios drive the room registry with mpsc-backed sessions and
//! documents built directly, so authorization and broadcast behavior
//! are observable without a database or sockets.

use chrono::Utc;
use sketchsync::collab::{CursorPosition, RoomRegistry, ServerEvent};
use sketchsync::documents::{AccessLevel, Collaborator, Document};
use sketchsync::error::AppError;
use uuid::Uuid;

use crate::common::{connected_session, drain};

fn document(owner_id: Uuid, collaborators: Vec<Collaborator>) -> Document {
    Document {
        id: Uuid::new_v4(),
        owner_id,
        title: "Board".to_string(),
        content: String::new(),
        collaborators,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_owner_edit_reaches_everyone_but_the_sender() {
    let registry = RoomRegistry::new();
    let owner_id = Uuid::new_v4();
    let doc = document(owner_id, vec![]);

    let (owner, mut owner_rx) = connected_session(&registry, &owner_id.to_string());
    let (peer, mut peer_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(owner.id, doc.id);
    registry.join(peer.id, doc.id);

    let delivered = registry
        .relay_edit(&owner, &doc, "circle at (3,4)".to_string())
        .unwrap();

    assert_eq!(delivered, 1);
    let events = drain(&mut peer_rx);
    assert!(matches!(
        events.as_slice(),
        [ServerEvent::DocumentUpdated { content, .. }] if content == "circle at (3,4)"
    ));
    assert!(drain(&mut owner_rx).is_empty());
}

#[tokio::test]
async fn test_write_collaborator_can_edit() {
    let registry = RoomRegistry::new();
    let writer_id = Uuid::new_v4();
    let doc = document(
        Uuid::new_v4(),
        vec![Collaborator {
            user_id: writer_id,
            access: AccessLevel::Write,
        }],
    );

    let (writer, _writer_rx) = connected_session(&registry, &writer_id.to_string());
    let (peer, mut peer_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(writer.id, doc.id);
    registry.join(peer.id, doc.id);

    registry
        .relay_edit(&writer, &doc, "square".to_string())
        .unwrap();
    assert_eq!(drain(&mut peer_rx).len(), 1);
}

#[tokio::test]
async fn test_read_collaborator_edit_is_denied_and_silent() {
    let registry = RoomRegistry::new();
    let reader_id = Uuid::new_v4();
    let doc = document(
        Uuid::new_v4(),
        vec![Collaborator {
            user_id: reader_id,
            access: AccessLevel::Read,
        }],
    );

    let (reader, _reader_rx) = connected_session(&registry, &reader_id.to_string());
    let (bystander, mut bystander_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(reader.id, doc.id);
    registry.join(bystander.id, doc.id);

    let result = registry.relay_edit(&reader, &doc, "erase everything".to_string());

    assert!(matches!(result, Err(AppError::PermissionDenied { .. })));
    // The denial desynchronizes nobody: the other member saw nothing.
    assert!(drain(&mut bystander_rx).is_empty());
}

#[tokio::test]
async fn test_stranger_edit_is_denied() {
    let registry = RoomRegistry::new();
    let doc = document(Uuid::new_v4(), vec![]);

    let (stranger, _rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(stranger.id, doc.id);

    let result = registry.relay_edit(&stranger, &doc, "hi".to_string());
    assert!(matches!(result, Err(AppError::PermissionDenied { .. })));
}

#[tokio::test]
async fn test_cursor_moves_need_no_authorization() {
    let registry = RoomRegistry::new();
    let doc_id = Uuid::new_v4();

    let (mover, _mover_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    let (peer, mut peer_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(mover.id, doc_id);
    registry.join(peer.id, doc_id);

    let delivered = registry.relay_cursor(&mover, doc_id, CursorPosition { x: 12.0, y: 7.5 });

    assert_eq!(delivered, 1);
    let events = drain(&mut peer_rx);
    match events.as_slice() {
        [ServerEvent::CursorMoved {
            identity, position, ..
        }] => {
            assert_eq!(identity, mover.identity());
            assert_eq!(position.x, 12.0);
        }
        other => panic!("expected one cursor event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_disconnected_session_receives_nothing_further() {
    let registry = RoomRegistry::new();
    let owner_id = Uuid::new_v4();
    let doc = document(owner_id, vec![]);

    let (owner, _owner_rx) = connected_session(&registry, &owner_id.to_string());
    let (leaver, mut leaver_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(owner.id, doc.id);
    registry.join(leaver.id, doc.id);

    registry.leave_all(leaver.id);
    assert!(!registry.is_member(leaver.id, doc.id));

    let delivered = registry
        .relay_edit(&owner, &doc, "after the exit".to_string())
        .unwrap();
    assert_eq!(delivered, 0);
    assert!(drain(&mut leaver_rx).is_empty());
}

#[tokio::test]
async fn test_sessions_in_other_rooms_are_untouched() {
    let registry = RoomRegistry::new();
    let owner_id = Uuid::new_v4();
    let doc = document(owner_id, vec![]);

    let (owner, _owner_rx) = connected_session(&registry, &owner_id.to_string());
    let (elsewhere, mut elsewhere_rx) = connected_session(&registry, &Uuid::new_v4().to_string());
    registry.join(owner.id, doc.id);
    registry.join(elsewhere.id, Uuid::new_v4());

    registry
        .relay_edit(&owner, &doc, "room-scoped".to_string())
        .unwrap();
    assert!(drain(&mut elsewhere_rx).is_empty());
}
