//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the websocket gateway and a small read-only HTTP surface under a
//! single Axum router. CORS admits the configured frontend origin.

pub mod rooms;
pub mod ws;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AllowedOrigin;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let origin = match &state.config.frontend_origin {
        AllowedOrigin::Any => AllowOrigin::any(),
        AllowedOrigin::Exact(value) => AllowOrigin::exact(value.clone()),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .route("/ws", get(ws::handle_ws))
        .route("/api/ws", get(ws::handle_ws))
        .route("/api/rooms/{id}/members", get(rooms::list_members))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
