//! Room registry — owns room lifetime and the connection index.
//!
//! DESIGN
//! ======
//! One `RwLock` guards the room map and the reverse connection index
//! (`connection_id -> (user_id, room_id)`). Each room sits behind its own
//! `Mutex`, so events in different rooms never contend.
//!
//! LOCK ORDER
//! ==========
//! Registry lock first, then room lock. Membership changes (join, leave,
//! create, destroy) hold the registry write lock through the whole change
//! via [`Membership`]; room events only take the read lock long enough to
//! resolve the room handle.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::state::Room;

pub type SharedRoom = Arc<Mutex<Room>>;

/// Reverse-index entry for one joined connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    pub user_id: String,
    pub room_id: String,
}

#[derive(Default)]
struct Inner {
    rooms: HashMap<String, SharedRoom>,
    connections: HashMap<Uuid, SessionKey>,
}

#[derive(Clone, Default)]
pub struct RoomRegistry {
    inner: Arc<RwLock<Inner>>,
}

impl RoomRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room for `room_id`, creating an empty one if absent.
    pub async fn get_or_create(&self, room_id: &str) -> SharedRoom {
        self.membership().await.get_or_create(room_id)
    }

    pub async fn lookup(&self, room_id: &str) -> Option<SharedRoom> {
        self.inner.read().await.rooms.get(room_id).cloned()
    }

    /// Destroy an empty room. Refuses while members remain.
    pub async fn remove(&self, room_id: &str) -> bool {
        self.membership().await.remove(room_id).await
    }

    /// Reverse lookup: which (user, room) a connection is bound to.
    pub async fn session(&self, connection_id: Uuid) -> Option<SessionKey> {
        self.inner.read().await.connections.get(&connection_id).cloned()
    }

    /// Resolve a connection straight to its room handle.
    pub async fn resolve(&self, connection_id: Uuid) -> Option<(SessionKey, SharedRoom)> {
        let inner = self.inner.read().await;
        let key = inner.connections.get(&connection_id)?;
        let room = inner.rooms.get(&key.room_id)?.clone();
        Some((key.clone(), room))
    }

    pub async fn room_count(&self) -> usize {
        self.inner.read().await.rooms.len()
    }

    pub async fn room_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.read().await.rooms.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Exclusive access for a membership change.
    pub async fn membership(&self) -> Membership<'_> {
        Membership { inner: self.inner.write().await }
    }
}

// =============================================================================
// MEMBERSHIP GUARD
// =============================================================================

/// Registry write guard. Room creation, destruction and index changes made
/// through one guard are atomic with respect to every other connection.
pub struct Membership<'a> {
    inner: RwLockWriteGuard<'a, Inner>,
}

impl Membership<'_> {
    pub fn get_or_create(&mut self, room_id: &str) -> SharedRoom {
        if let Some(room) = self.inner.rooms.get(room_id) {
            return room.clone();
        }
        let room = Arc::new(Mutex::new(Room::new(room_id)));
        self.inner.rooms.insert(room_id.to_string(), room.clone());
        info!(%room_id, rooms = self.inner.rooms.len(), "room created");
        room
    }

    #[must_use]
    pub fn lookup(&self, room_id: &str) -> Option<SharedRoom> {
        self.inner.rooms.get(room_id).cloned()
    }

    pub async fn remove(&mut self, room_id: &str) -> bool {
        let Some(room) = self.inner.rooms.get(room_id) else {
            return false;
        };
        let members = room.lock().await.len();
        if members > 0 {
            warn!(%room_id, members, "refusing to remove non-empty room");
            return false;
        }
        self.inner.rooms.remove(room_id);
        info!(%room_id, rooms = self.inner.rooms.len(), "room destroyed");
        true
    }

    pub fn bind(&mut self, connection_id: Uuid, key: SessionKey) {
        self.inner.connections.insert(connection_id, key);
    }

    pub fn unbind(&mut self, connection_id: Uuid) -> Option<SessionKey> {
        self.inner.connections.remove(&connection_id)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
