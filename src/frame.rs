//! Frame — the envelope for every websocket message.
//!
//! ARCHITECTURE
//! ============
//! Clients and the server exchange one JSON frame per websocket text
//! message. The gateway routes on `event` and hands `data` to the protocol
//! layer for typed decoding. Outbound frames are built here and pushed onto
//! member outboxes by the broadcast router.
//!
//! DESIGN
//! ======
//! - `data` is any JSON value: snapshots are arrays, relays are objects,
//!   `canvas-cleared` carries nothing.
//! - Inbound frames may omit everything but `event`; defaults fill the rest.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Milliseconds since Unix epoch. Set automatically at construction.
    #[serde(default)]
    pub ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

impl Frame {
    /// Create an event frame with a JSON payload.
    pub fn event(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self { id: Uuid::new_v4(), ts: now_ms(), room_id: None, from: None, event: event.into(), data }
    }

    /// Create an event frame that carries no payload.
    pub fn signal(event: impl Into<String>) -> Self {
        Self::event(event, serde_json::Value::Null)
    }

    /// Build an event frame from any serializable payload.
    ///
    /// Serialization of the domain types cannot fail (string keys, no
    /// non-finite floats from JSON input), so a failure degrades to `null`.
    pub fn with_payload<T: Serialize>(event: impl Into<String>, payload: &T) -> Self {
        Self::event(event, serde_json::to_value(payload).unwrap_or_default())
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

impl Frame {
    #[must_use]
    pub fn with_room_id(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    #[must_use]
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;
