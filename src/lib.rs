//! Real-time room coordination for a shared drawing board with chat and
//! peer-to-peer video signaling.

pub mod config;
pub mod error;
pub mod frame;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
