use super::*;
use crate::protocol::JoinRoom;
use crate::services::session::join;
use crate::state::{Role, test_helpers};
use axum::Json;
use axum::extract::{Path, State};
use tokio::sync::mpsc;
use uuid::Uuid;

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[tokio::test]
async fn members_of_unknown_room_is_not_found() {
    let state = test_helpers::test_app_state();
    let result = rooms::list_members(State(state.clone()), Path("ghost".to_string())).await;
    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
    assert_eq!(state.rooms.room_count().await, 0, "lookup must not create rooms");
}

#[tokio::test]
async fn members_lists_live_roster() {
    let state = test_helpers::test_app_state();
    let (tx, _rx) = mpsc::unbounded_channel();
    for user in ["a", "b"] {
        let req = JoinRoom { room_id: "r1".into(), user_id: user.into(), user_name: user.to_uppercase() };
        join(&state.rooms, Uuid::new_v4(), &tx, req).await;
    }

    let Ok(Json(roster)) = rooms::list_members(State(state), Path("r1".to_string())).await else {
        panic!("room should exist");
    };
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].id, "a");
    assert_eq!(roster[0].role, Role::Admin);
    assert_eq!(roster[1].name, "B");
    assert_eq!(roster[1].role, Role::Editor);
}

#[test]
fn router_builds_with_wildcard_origin() {
    let config = crate::config::ServerConfig { frontend_origin: AllowedOrigin::Any, ..Default::default() };
    let _router = app(AppState::new(config));
}
