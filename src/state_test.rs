use super::*;
use super::test_helpers::{chat, stroke};

fn outbox() -> Outbox {
    mpsc::unbounded_channel().0
}

#[test]
fn room_new_is_empty() {
    let room = Room::new("r1");
    assert!(room.is_empty());
    assert_eq!(room.len(), 0);
    assert!(room.drawing_log().is_empty());
    assert!(room.chat_log().is_empty());
}

#[test]
fn first_joiner_is_admin_then_editors() {
    let mut room = Room::new("r1");
    assert_eq!(room.role_for_joiner(), Role::Admin);
    room.insert_member("a", "A", Role::Admin, Uuid::new_v4(), outbox());
    assert_eq!(room.role_for_joiner(), Role::Editor);
}

#[test]
fn roster_follows_join_order() {
    let mut room = Room::new("r1");
    for id in ["c", "a", "b"] {
        let role = room.role_for_joiner();
        room.insert_member(id, id.to_uppercase(), role, Uuid::new_v4(), outbox());
    }
    let roster = room.roster();
    let ids: Vec<&str> = roster.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
    assert_eq!(roster[0].role, Role::Admin);
    assert_eq!(roster[1].role, Role::Editor);
    assert_eq!(roster[1].name, "A");
}

#[test]
fn remove_member_requires_matching_connection() {
    let mut room = Room::new("r1");
    let old_conn = Uuid::new_v4();
    let new_conn = Uuid::new_v4();
    room.insert_member("a", "A", Role::Admin, old_conn, outbox());
    let replaced = room.insert_member("a", "A", Role::Admin, new_conn, outbox());
    assert_eq!(replaced.map(|m| m.connection_id), Some(old_conn));

    assert!(room.remove_member("a", old_conn).is_none());
    assert_eq!(room.len(), 1);
    assert!(room.member_for("a", old_conn).is_none());
    assert!(room.member_for("a", new_conn).is_some());

    assert!(room.remove_member("a", new_conn).is_some());
    assert!(room.is_empty());
}

#[test]
fn clear_truncates_drawings_but_not_chat() {
    let mut room = Room::new("r1");
    room.append_drawing(stroke(1.0, 1.0));
    room.append_drawing(stroke(2.0, 2.0));
    room.append_chat(chat("m1", "a", "hi"));

    room.clear_drawings();

    assert!(room.drawing_log().is_empty());
    assert_eq!(room.chat_log().len(), 1);

    room.append_drawing(stroke(3.0, 3.0));
    assert_eq!(room.drawing_log(), &[stroke(3.0, 3.0)]);
}

#[test]
fn roster_entry_serializes_lowercase_role() {
    let entry = RosterEntry { id: "a".into(), name: "A".into(), role: Role::Viewer };
    let json = serde_json::to_value(&entry).expect("serialize");
    assert_eq!(json, serde_json::json!({"id": "a", "name": "A", "role": "viewer"}));
}

#[test]
fn role_display_matches_wire_name() {
    assert_eq!(Role::Admin.to_string(), "admin");
    assert_eq!(Role::Editor.to_string(), "editor");
    assert_eq!(Role::Viewer.to_string(), "viewer");
}

#[test]
fn rename_member_requires_current_connection() {
    let mut room = Room::new("r1");
    let conn = Uuid::new_v4();
    room.insert_member("a", "A", Role::Admin, conn, outbox());
    room.insert_member("b", "B", Role::Editor, Uuid::new_v4(), outbox());

    assert!(room.rename_member("a", conn, "Ada"));
    assert!(!room.rename_member("a", Uuid::new_v4(), "Mallory"));
    assert!(!room.rename_member("ghost", conn, "Ghost"));

    let roster = room.roster();
    assert_eq!(roster[0].name, "Ada");
    assert_eq!(roster[0].role, Role::Admin);
    assert_eq!(roster[1].id, "b");
}
