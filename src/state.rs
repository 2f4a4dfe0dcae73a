//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the room registry and the server configuration. Each room keeps
//! its members, the drawing log, and the chat log in memory for as long as
//! anyone is connected; nothing outlives the process.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::frame::Frame;
use crate::protocol::{ChatMessage, DrawingEvent};
use crate::services::registry::RoomRegistry;

/// Sending half of a connection's outbound queue. Unbounded: sends never wait.
pub type Outbox = mpsc::UnboundedSender<Frame>;

// =============================================================================
// ROLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// MEMBER
// =============================================================================

/// A connected participant. Owned by exactly one room.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
    pub connection_id: Uuid,
    /// Outbound queue of the member's connection.
    pub outbox: Outbox,
    /// Position in join order; drives roster ordering.
    seq: u64,
}

impl Member {
    #[must_use]
    pub fn origin(&self) -> Origin {
        Origin { user_id: self.user_id.clone(), connection_id: self.connection_id, role: self.role }
    }
}

/// Identity of the member an event came from, detached from the room borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub user_id: String,
    pub connection_id: Uuid,
    pub role: Role,
}

/// Roster entry as broadcast in `users-update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub role: Role,
}

// =============================================================================
// ROOM
// =============================================================================

/// Authoritative per-room record. Lives in the registry while non-empty.
#[derive(Debug)]
pub struct Room {
    pub id: String,
    members: HashMap<String, Member>,
    drawing_log: Vec<DrawingEvent>,
    chat_log: Vec<ChatMessage>,
    next_seq: u64,
}

impl Room {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), members: HashMap::new(), drawing_log: Vec::new(), chat_log: Vec::new(), next_seq: 0 }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Role for the next joiner: the first member of an empty room is admin.
    #[must_use]
    pub fn role_for_joiner(&self) -> Role {
        if self.members.is_empty() { Role::Admin } else { Role::Editor }
    }

    /// Insert a member, replacing any entry with the same user id.
    pub fn insert_member(
        &mut self,
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        connection_id: Uuid,
        outbox: Outbox,
    ) -> Option<Member> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let user_id = user_id.into();
        let member = Member { user_id: user_id.clone(), display_name: display_name.into(), role, connection_id, outbox, seq };
        self.members.insert(user_id, member)
    }

    /// Remove a member, but only if it is still bound to `connection_id`.
    pub fn remove_member(&mut self, user_id: &str, connection_id: Uuid) -> Option<Member> {
        if self.members.get(user_id)?.connection_id != connection_id {
            return None;
        }
        self.members.remove(user_id)
    }

    /// Update the display name of the member bound to `connection_id`.
    /// Role and join position are untouched. False if the binding is stale.
    pub fn rename_member(&mut self, user_id: &str, connection_id: Uuid, display_name: &str) -> bool {
        match self.members.get_mut(user_id) {
            Some(member) if member.connection_id == connection_id => {
                display_name.clone_into(&mut member.display_name);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn member(&self, user_id: &str) -> Option<&Member> {
        self.members.get(user_id)
    }

    /// Member bound to this exact connection, if the binding is still current.
    #[must_use]
    pub fn member_for(&self, user_id: &str, connection_id: Uuid) -> Option<&Member> {
        self.members
            .get(user_id)
            .filter(|m| m.connection_id == connection_id)
    }

    /// Members in join order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by_key(|m| m.seq);
        members.into_iter()
    }

    #[must_use]
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.members()
            .map(|m| RosterEntry { id: m.user_id.clone(), name: m.display_name.clone(), role: m.role })
            .collect()
    }

    #[must_use]
    pub fn drawing_log(&self) -> &[DrawingEvent] {
        &self.drawing_log
    }

    #[must_use]
    pub fn chat_log(&self) -> &[ChatMessage] {
        &self.chat_log
    }

    pub fn append_drawing(&mut self, event: DrawingEvent) {
        self.drawing_log.push(event);
    }

    pub fn append_chat(&mut self, message: ChatMessage) {
        self.chat_log.push(message);
    }

    /// The only non-append mutation of either log.
    pub fn clear_drawings(&mut self) {
        self.drawing_log.clear();
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomRegistry,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { rooms: RoomRegistry::new(), config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
