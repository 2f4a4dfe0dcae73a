//! Read-only room inspection over HTTP.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::state::{AppState, RosterEntry};

/// `GET /api/rooms/{id}/members`: the live roster, in join order.
///
/// # Errors
///
/// Returns `404` if no room with that id is currently alive.
pub async fn list_members(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<RosterEntry>>, StatusCode> {
    let Some(room) = state.rooms.lookup(&room_id).await else {
        return Err(StatusCode::NOT_FOUND);
    };
    let roster = room.lock().await.roster();
    Ok(Json(roster))
}
