//! # courier-server
//!
//! The single server binary: axum REST surface and the WebSocket
//! gateway (connection registry, message router, offline replay) in one
//! process sharing one state.

pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
