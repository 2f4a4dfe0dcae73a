//! Session service — the connection gateway's lifecycle and event routing.
//!
//! DESIGN
//! ======
//! Each websocket connection owns one `Session`, created at accept time and
//! carried through every handler. The session walks a three-state machine:
//!
//! ```text
//! Unjoined --join-room--> Joined --disconnect--> Left
//!                          |  ^
//!                          +--+ join-room: same room refreshes in place,
//!                               another room leaves the current one first
//! ```
//!
//! `Left` is terminal. The registry's connection index stays authoritative
//! for which room and user a connection acts as; the session state only
//! decides which events are admissible at all.
//!
//! Nothing here ever replies with an error. Malformed, unauthorized, stale
//! and out-of-state events are logged at `debug` and dropped.

use tracing::{debug, info};
use uuid::Uuid;

use crate::protocol::{ClientEvent, JoinRoom};
use crate::services::broadcast;
use crate::services::permission::{Action, permits};
use crate::services::registry::{RoomRegistry, SessionKey};
use crate::services::signaling::{self, Signal};
use crate::state::{AppState, Member, Outbox, Role};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unjoined,
    Joined { room_id: String, user_id: String },
    Left,
}

pub struct Session {
    pub connection_id: Uuid,
    outbox: Outbox,
    state: ConnectionState,
}

impl Session {
    #[must_use]
    pub fn new(outbox: Outbox) -> Self {
        Self { connection_id: Uuid::new_v4(), outbox, state: ConnectionState::Unjoined }
    }

    #[must_use]
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Apply one decoded inbound event.
    pub async fn handle(&mut self, app: &AppState, event: ClientEvent) {
        let connection_id = self.connection_id;
        if self.state == ConnectionState::Left {
            debug!(%connection_id, event = event.name(), "session: dropping event after leave");
            return;
        }
        let joined = matches!(self.state, ConnectionState::Joined { .. });

        match event {
            ClientEvent::JoinRoom(req) => {
                if self.is_joined_as(&req) && refresh(&app.rooms, connection_id, &req).await {
                    return;
                }
                if joined {
                    leave(&app.rooms, connection_id).await;
                }
                self.enter(app, req).await;
            }
            event if !joined => {
                debug!(%connection_id, event = event.name(), "session: dropping event before join");
            }
            event => route(&app.rooms, connection_id, event).await,
        }
    }

    /// Transport-level disconnect. Idempotent.
    pub async fn disconnect(&mut self, app: &AppState) {
        if self.state == ConnectionState::Left {
            return;
        }
        self.state = ConnectionState::Left;
        leave(&app.rooms, self.connection_id).await;
    }

    fn is_joined_as(&self, req: &JoinRoom) -> bool {
        matches!(&self.state, ConnectionState::Joined { room_id, user_id }
            if *room_id == req.room_id && *user_id == req.user_id)
    }

    async fn enter(&mut self, app: &AppState, req: JoinRoom) {
        let room_id = req.room_id.clone();
        let user_id = req.user_id.clone();
        join(&app.rooms, self.connection_id, &self.outbox, req).await;
        self.state = ConnectionState::Joined { room_id, user_id };
    }
}

// =============================================================================
// JOIN / LEAVE
// =============================================================================

/// Admit a connection to a room and return the role it was assigned.
///
/// The joiner receives `canvas-state` and `chat-history` first, then every
/// member (joiner included) receives the new roster.
pub async fn join(registry: &RoomRegistry, connection_id: Uuid, outbox: &Outbox, req: JoinRoom) -> Role {
    let mut membership = registry.membership().await;
    let shared = membership.get_or_create(&req.room_id);
    let mut room = shared.lock().await;

    let role = room.role_for_joiner();
    let replaced = room.insert_member(req.user_id.clone(), req.user_name.clone(), role, connection_id, outbox.clone());
    membership.bind(connection_id, SessionKey { user_id: req.user_id.clone(), room_id: req.room_id.clone() });
    drop(membership);

    if let Some(previous) = replaced {
        info!(room_id = %req.room_id, user_id = %req.user_id, old_connection = %previous.connection_id, "member replaced by newer connection");
    }

    if let Some(member) = room.member(&req.user_id) {
        broadcast::send_snapshot(&room, member);
    }
    broadcast::publish_roster(&room);

    info!(
        room_id = %req.room_id,
        user_id = %req.user_id,
        user_name = %req.user_name,
        %role,
        members = room.len(),
        "member joined"
    );
    role
}

/// Repeat `join-room` for the room and user a connection already holds.
///
/// The member keeps its role, join position and the room's logs. The joiner
/// gets the snapshot again and the room gets the roster. Returns false if the
/// connection no longer owns that membership.
pub async fn refresh(registry: &RoomRegistry, connection_id: Uuid, req: &JoinRoom) -> bool {
    let Some((key, shared)) = registry.resolve(connection_id).await else {
        return false;
    };
    if key.room_id != req.room_id || key.user_id != req.user_id {
        return false;
    }
    let mut room = shared.lock().await;
    if !room.rename_member(&key.user_id, connection_id, &req.user_name) {
        return false;
    }

    if let Some(member) = room.member(&key.user_id) {
        broadcast::send_snapshot(&room, member);
    }
    broadcast::publish_roster(&room);
    debug!(%connection_id, room_id = %key.room_id, user_id = %key.user_id, "session: repeat join, membership kept");
    true
}

/// Tear down a connection's membership. Returns false if it was not bound.
///
/// Remaining members get the new roster; an emptied room is destroyed.
pub async fn leave(registry: &RoomRegistry, connection_id: Uuid) -> bool {
    let mut membership = registry.membership().await;
    let Some(key) = membership.unbind(connection_id) else {
        return false;
    };
    let Some(shared) = membership.lookup(&key.room_id) else {
        return true;
    };

    let now_empty = {
        let mut room = shared.lock().await;
        if room.remove_member(&key.user_id, connection_id).is_none() {
            debug!(%connection_id, room_id = %key.room_id, "session: stale connection left, roster unchanged");
            return true;
        }
        broadcast::publish_roster(&room);
        info!(room_id = %key.room_id, user_id = %key.user_id, remaining = room.len(), "member left");
        room.is_empty()
    };

    if now_empty {
        membership.remove(&key.room_id).await;
    }
    true
}

// =============================================================================
// ROOM EVENTS
// =============================================================================

/// Route a room event from a joined connection through the permission gate.
pub async fn route(registry: &RoomRegistry, connection_id: Uuid, event: ClientEvent) {
    let Some((key, shared)) = registry.resolve(connection_id).await else {
        debug!(%connection_id, event = event.name(), "session: no room for connection");
        return;
    };
    let mut room = shared.lock().await;
    let Some(origin) = room.member_for(&key.user_id, connection_id).map(Member::origin) else {
        debug!(%connection_id, event = event.name(), "session: stale connection, dropping event");
        return;
    };

    let action = match &event {
        ClientEvent::Drawing(_) => Action::Draw,
        ClientEvent::ClearCanvas => Action::ClearCanvas,
        ClientEvent::Message(_) => Action::Chat,
        ClientEvent::JoinRoom(_) => Action::Join,
        _ => Action::Signal,
    };
    if !permits(origin.role, action) {
        debug!(%connection_id, role = %origin.role, ?action, "session: action not permitted, dropping");
        return;
    }

    match event {
        ClientEvent::Drawing(stroke) => broadcast::relay_drawing(&mut room, &origin, stroke),
        ClientEvent::ClearCanvas => broadcast::relay_clear(&mut room, &origin),
        ClientEvent::Message(message) => broadcast::relay_chat(&mut room, &origin, message),
        ClientEvent::JoinRoom(_) => {}
        event => {
            if event.signal_room().is_some_and(|target| target != room.id) {
                debug!(%connection_id, event = event.name(), "session: signal addressed to another room, dropping");
                return;
            }
            if let Some(signal) = Signal::from_event(event) {
                signaling::relay(&room, &origin, signal);
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
