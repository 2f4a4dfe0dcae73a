use super::*;
use serde_json::json;

#[test]
fn event_sets_fields() {
    let frame = Frame::event("drawing", json!({"x": 1.0}));
    assert_eq!(frame.event, "drawing");
    assert!(frame.room_id.is_none());
    assert!(frame.from.is_none());
    assert!(frame.ts > 0);
    assert_eq!(frame.data["x"], json!(1.0));
}

#[test]
fn signal_carries_null_data() {
    let frame = Frame::signal("canvas-cleared");
    assert_eq!(frame.event, "canvas-cleared");
    assert!(frame.data.is_null());
}

#[test]
fn inbound_frame_fills_defaults() {
    let frame: Frame = serde_json::from_str(r#"{"event":"clear-canvas"}"#).expect("parse");
    assert_eq!(frame.event, "clear-canvas");
    assert_eq!(frame.ts, 0);
    assert!(frame.data.is_null());
    assert!(frame.room_id.is_none());
}

#[test]
fn inbound_frame_without_event_is_rejected() {
    assert!(serde_json::from_str::<Frame>(r#"{"data":{}}"#).is_err());
}

#[test]
fn builders_stamp_room_and_origin() {
    let frame = Frame::signal("users-update")
        .with_room_id("r1")
        .with_from("alice");
    assert_eq!(frame.room_id.as_deref(), Some("r1"));
    assert_eq!(frame.from.as_deref(), Some("alice"));

    let json = serde_json::to_value(&frame).expect("serialize");
    assert_eq!(json["room_id"], json!("r1"));
    assert_eq!(json["from"], json!("alice"));
}

#[test]
fn absent_routing_fields_are_not_serialized() {
    let json = serde_json::to_value(Frame::signal("canvas-cleared")).expect("serialize");
    assert!(json.get("room_id").is_none());
    assert!(json.get("from").is_none());
}

#[test]
fn with_payload_serializes_arrays() {
    let frame = Frame::with_payload("chat-history", &Vec::<String>::new());
    assert_eq!(frame.data, json!([]));
}
