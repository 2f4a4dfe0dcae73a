//! Protocol — typed inbound events and the payload types they carry.
//!
//! DESIGN
//! ======
//! A `Frame` is decoded into a `ClientEvent` at the boundary. Everything
//! past the gateway works with these types instead of raw JSON. Drawing
//! geometry and WebRTC descriptions stay opaque: they are validated for
//! shape only and forwarded as received.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::frame::Frame;

// =============================================================================
// EVENT NAMES
// =============================================================================

pub const JOIN_ROOM: &str = "join-room";
pub const DRAWING: &str = "drawing";
pub const CLEAR_CANVAS: &str = "clear-canvas";
pub const MESSAGE: &str = "message";
pub const VIDEO_OFFER: &str = "video-offer";
pub const VIDEO_ANSWER: &str = "video-answer";
pub const ICE_CANDIDATE: &str = "ice-candidate";
pub const LEAVE_VIDEO: &str = "leave-video";

pub const CANVAS_STATE: &str = "canvas-state";
pub const CHAT_HISTORY: &str = "chat-history";
pub const USERS_UPDATE: &str = "users-update";
pub const CANVAS_CLEARED: &str = "canvas-cleared";
pub const USER_LEFT_VIDEO: &str = "user-left-video";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    #[error("malformed {event} payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{event}: {field} must not be empty")]
    EmptyField { event: &'static str, field: &'static str },
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoom {
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Brush,
    Eraser,
}

/// One stroke increment. Unknown fields ride along in `extra`.
///
/// Geometry stays a JSON `Number` so integers are relayed as integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingEvent {
    pub x: Number,
    pub y: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_x: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_y: Option<Number>,
    pub color: String,
    pub size: Number,
    pub tool: Tool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Either epoch milliseconds or an ISO-8601 string, as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(Number),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(alias = "message")]
    pub text: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOffer {
    #[serde(default)]
    pub room_id: Option<String>,
    pub offer: Value,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnswer {
    #[serde(default)]
    pub room_id: Option<String>,
    pub answer: Value,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    #[serde(default)]
    pub room_id: Option<String>,
    pub candidate: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveVideo {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

// =============================================================================
// CLIENT EVENT
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    JoinRoom(JoinRoom),
    Drawing(DrawingEvent),
    ClearCanvas,
    Message(ChatMessage),
    VideoOffer(VideoOffer),
    VideoAnswer(VideoAnswer),
    IceCandidate(IceCandidate),
    LeaveVideo(LeaveVideo),
}

impl ClientEvent {
    /// Wire name of the event, for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => JOIN_ROOM,
            Self::Drawing(_) => DRAWING,
            Self::ClearCanvas => CLEAR_CANVAS,
            Self::Message(_) => MESSAGE,
            Self::VideoOffer(_) => VIDEO_OFFER,
            Self::VideoAnswer(_) => VIDEO_ANSWER,
            Self::IceCandidate(_) => ICE_CANDIDATE,
            Self::LeaveVideo(_) => LEAVE_VIDEO,
        }
    }

    /// The room named inside a signaling payload, if any.
    #[must_use]
    pub fn signal_room(&self) -> Option<&str> {
        match self {
            Self::VideoOffer(v) => v.room_id.as_deref(),
            Self::VideoAnswer(v) => v.room_id.as_deref(),
            Self::IceCandidate(v) => v.room_id.as_deref(),
            Self::LeaveVideo(v) => v.room_id.as_deref(),
            _ => None,
        }
    }
}

impl TryFrom<&Frame> for ClientEvent {
    type Error = ProtocolError;

    fn try_from(frame: &Frame) -> Result<Self, Self::Error> {
        match frame.event.as_str() {
            JOIN_ROOM => {
                let join: JoinRoom = decode(JOIN_ROOM, &frame.data)?;
                if join.room_id.trim().is_empty() {
                    return Err(ProtocolError::EmptyField { event: JOIN_ROOM, field: "roomId" });
                }
                if join.user_id.trim().is_empty() {
                    return Err(ProtocolError::EmptyField { event: JOIN_ROOM, field: "userId" });
                }
                Ok(Self::JoinRoom(join))
            }
            DRAWING => Ok(Self::Drawing(decode(DRAWING, &frame.data)?)),
            CLEAR_CANVAS => Ok(Self::ClearCanvas),
            MESSAGE => Ok(Self::Message(decode(MESSAGE, &frame.data)?)),
            VIDEO_OFFER => Ok(Self::VideoOffer(decode(VIDEO_OFFER, &frame.data)?)),
            VIDEO_ANSWER => Ok(Self::VideoAnswer(decode(VIDEO_ANSWER, &frame.data)?)),
            ICE_CANDIDATE => Ok(Self::IceCandidate(decode(ICE_CANDIDATE, &frame.data)?)),
            LEAVE_VIDEO => {
                // Payload is advisory; a bare `leave-video` is still a teardown.
                if frame.data.is_null() {
                    return Ok(Self::LeaveVideo(LeaveVideo { room_id: None, user_id: None }));
                }
                Ok(Self::LeaveVideo(decode(LEAVE_VIDEO, &frame.data)?))
            }
            other => Err(ProtocolError::UnknownEvent(other.to_string())),
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(event: &'static str, data: &Value) -> Result<T, ProtocolError> {
    T::deserialize(data).map_err(|source| ProtocolError::Malformed { event, source })
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
