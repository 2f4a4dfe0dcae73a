//! WebSocket handler — transport side of the connection gateway.
//!
//! DESIGN
//! ======
//! On upgrade, creates a `Session` with its own outbox and enters a
//! `select!` loop:
//! - Incoming client frames → parse → typed event → session
//! - Frames queued on the outbox by room peers → forward to client
//!
//! The session never writes to the socket directly; everything it emits,
//! including the joiner's own snapshot, goes through the outbox so the
//! socket sees one ordered stream.
//!
//! LIFECYCLE
//! =========
//! 1. Upgrade → session `Unjoined`
//! 2. `join-room` → `Joined`, snapshot + roster queued
//! 3. Close, transport error, or failed send → `disconnect` → `Left`

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::frame::Frame;
use crate::protocol::ClientEvent;
use crate::services::session::Session;
use crate::state::AppState;

// =============================================================================
// UPGRADE
// =============================================================================

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

// =============================================================================
// CONNECTION
// =============================================================================

async fn run_ws(mut socket: WebSocket, state: AppState) {
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<Frame>();
    let mut session = Session::new(client_tx);
    let connection_id = session.connection_id;

    info!(%connection_id, "ws: client connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(msg) = msg else { break };
                let Ok(msg) = msg else { break };
                match msg {
                    Message::Text(text) => {
                        process_inbound_text(&state, &mut session, &text).await;
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            Some(frame) = client_rx.recv() => {
                if send_frame(&mut socket, &frame).await.is_err() {
                    break;
                }
            }
        }
    }

    session.disconnect(&state).await;
    info!(%connection_id, "ws: client disconnected");
}

// =============================================================================
// FRAME DISPATCH
// =============================================================================

/// Parse one inbound text frame and hand it to the session.
///
/// Undecodable input is logged and dropped; the client never hears about it.
pub async fn process_inbound_text(state: &AppState, session: &mut Session, text: &str) {
    let connection_id = session.connection_id;
    let frame: Frame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(%connection_id, error = %e, "ws: invalid inbound frame");
            return;
        }
    };

    let event = match ClientEvent::try_from(&frame) {
        Ok(event) => event,
        Err(e) => {
            warn!(%connection_id, event = %frame.event, error = %e, "ws: undecodable event");
            return;
        }
    };

    debug!(%connection_id, id = %frame.id, event = event.name(), "ws: recv frame");
    session.handle(state, event).await;
}

// =============================================================================
// HELPERS
// =============================================================================

async fn send_frame(socket: &mut WebSocket, frame: &Frame) -> Result<(), ()> {
    let json = match serde_json::to_string(frame) {
        Ok(j) => j,
        Err(e) => {
            warn!(error = %e, "ws: failed to serialize frame");
            return Err(());
        }
    };
    debug!(id = %frame.id, event = %frame.event, "ws: send frame");
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}

#[cfg(test)]
#[path = "ws_test.rs"]
mod tests;
