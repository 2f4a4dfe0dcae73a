//! Broadcast router — room-scoped fan-out and log mutation.
//!
//! DESIGN
//! ======
//! A room is a topic; membership is the subscription. Every function here
//! takes the room already locked, so log mutation and fan-out for one event
//! happen in a single critical section and peers observe events in the
//! order the room processed them.
//!
//! Sends are fire-and-forget into unbounded outboxes. A closed outbox means
//! the connection is tearing down; its disconnect will clean up.

use uuid::Uuid;

use crate::frame::Frame;
use crate::protocol::{self, ChatMessage, DrawingEvent};
use crate::state::{Member, Origin, Room};

// =============================================================================
// FAN-OUT
// =============================================================================

/// Send a frame to every member of the room, optionally excluding one connection.
pub fn publish(room: &Room, frame: &Frame, exclude: Option<Uuid>) -> usize {
    let mut delivered = 0;
    for member in room.members() {
        if exclude == Some(member.connection_id) {
            continue;
        }
        if member.outbox.send(frame.clone()).is_ok() {
            delivered += 1;
        }
    }
    delivered
}

fn unicast(member: &Member, frame: Frame) {
    let _ = member.outbox.send(frame);
}

// =============================================================================
// EVENTS
// =============================================================================

/// Append a stroke and relay it to everyone but the sender.
pub fn relay_drawing(room: &mut Room, sender: &Origin, event: DrawingEvent) {
    let frame = Frame::with_payload(protocol::DRAWING, &event)
        .with_room_id(room.id.clone())
        .with_from(sender.user_id.clone());
    room.append_drawing(event);
    publish(room, &frame, Some(sender.connection_id));
}

/// Append a chat message and relay it to everyone, sender included.
pub fn relay_chat(room: &mut Room, sender: &Origin, message: ChatMessage) {
    let frame = Frame::with_payload(protocol::MESSAGE, &message)
        .with_room_id(room.id.clone())
        .with_from(sender.user_id.clone());
    room.append_chat(message);
    publish(room, &frame, None);
}

/// Empty the drawing log and tell everyone, sender included.
pub fn relay_clear(room: &mut Room, sender: &Origin) {
    room.clear_drawings();
    let frame = Frame::signal(protocol::CANVAS_CLEARED)
        .with_room_id(room.id.clone())
        .with_from(sender.user_id.clone());
    publish(room, &frame, None);
}

/// Broadcast the current roster to every member.
pub fn publish_roster(room: &Room) {
    let frame = Frame::with_payload(protocol::USERS_UPDATE, &room.roster()).with_room_id(room.id.clone());
    publish(room, &frame, None);
}

/// Unicast the drawing and chat snapshot to a single (joining) member.
pub fn send_snapshot(room: &Room, member: &Member) {
    unicast(
        member,
        Frame::with_payload(protocol::CANVAS_STATE, &room.drawing_log()).with_room_id(room.id.clone()),
    );
    unicast(
        member,
        Frame::with_payload(protocol::CHAT_HISTORY, &room.chat_log()).with_room_id(room.id.clone()),
    );
}

#[cfg(test)]
#[path = "broadcast_test.rs"]
mod tests;
