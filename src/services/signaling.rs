//! Signaling relay — WebRTC negotiation pass-through.
//!
//! DESIGN
//! ======
//! Offers, answers and ICE candidates are forwarded to every other member
//! of the sender's room. Payloads are never inspected or stored; each
//! recipient decides relevance from the embedded `userId`, which falls back
//! to the sender's membership when the client leaves it out. `leave-video`
//! becomes `user-left-video` so peers tear down their remote connection;
//! the sender already knows it left and is not told again.
//! Assumes at most two active video participants per room.

use serde_json::{Value, json};

use crate::frame::Frame;
use crate::protocol::{self, ClientEvent};
use crate::services::broadcast;
use crate::state::{Origin, Room};

/// A negotiation message, reduced to what the relay forwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Offer { offer: Value, user_id: Option<String> },
    Answer { answer: Value, user_id: Option<String> },
    IceCandidate { candidate: Value },
    Leave,
}

impl Signal {
    /// Extract the relayable part of a signaling event. `None` for non-signaling events.
    #[must_use]
    pub fn from_event(event: ClientEvent) -> Option<Self> {
        match event {
            ClientEvent::VideoOffer(v) => Some(Self::Offer { offer: v.offer, user_id: v.user_id }),
            ClientEvent::VideoAnswer(v) => Some(Self::Answer { answer: v.answer, user_id: v.user_id }),
            ClientEvent::IceCandidate(v) => Some(Self::IceCandidate { candidate: v.candidate }),
            ClientEvent::LeaveVideo(_) => Some(Self::Leave),
            _ => None,
        }
    }

    fn into_frame(self, sender: &Origin) -> Frame {
        match self {
            Self::Offer { offer, user_id } => {
                let user_id = user_id.unwrap_or_else(|| sender.user_id.clone());
                Frame::event(protocol::VIDEO_OFFER, json!({"offer": offer, "userId": user_id}))
            }
            Self::Answer { answer, user_id } => {
                let user_id = user_id.unwrap_or_else(|| sender.user_id.clone());
                Frame::event(protocol::VIDEO_ANSWER, json!({"answer": answer, "userId": user_id}))
            }
            Self::IceCandidate { candidate } => Frame::event(
                protocol::ICE_CANDIDATE,
                json!({"candidate": candidate, "userId": sender.user_id}),
            ),
            Self::Leave => Frame::event(protocol::USER_LEFT_VIDEO, json!({"userId": sender.user_id})),
        }
    }
}

/// Forward a signal to every member of the room except the sender.
pub fn relay(room: &Room, sender: &Origin, signal: Signal) -> usize {
    let frame = signal
        .into_frame(sender)
        .with_room_id(room.id.clone())
        .with_from(sender.user_id.clone());
    broadcast::publish(room, &frame, Some(sender.connection_id))
}

#[cfg(test)]
#[path = "signaling_test.rs"]
mod tests;
