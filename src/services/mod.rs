//! Room coordination services used by the websocket gateway and HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! `registry` owns the room map and the connection index. `session` drives a
//! single connection through join, routing, and leave. Fan-out lives in
//! `broadcast` and `signaling`; `permission` is a pure role table consulted
//! before any room mutation.

pub mod broadcast;
pub mod permission;
pub mod registry;
pub mod session;
pub mod signaling;
