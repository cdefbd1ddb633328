//! Route definitions
//!
//! REST endpoints live under /api/v1; the WebSocket upgrade and the
//! health endpoints sit at the root.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::gateway::socket::ws_handler;
use crate::handlers::{auth, conversations, groups, health, messages, users};
use crate::state::AppState;

/// Create the full application router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        .route("/ws", get(ws_handler))
        .route("/ws/status", get(health::gateway_status))
        .nest("/api/v1", api_v1_routes())
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(messaging_routes())
        .merge(group_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/session", get(auth::session))
        .route("/auth/reset/request", post(auth::request_reset))
        .route("/auth/reset/confirm", post(auth::confirm_reset))
        .route("/users/lookup/:username", get(users::lookup))
}

fn messaging_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::list))
        .route("/conversation/:peer_id", get(conversations::history))
        .route("/messages/unread", get(messages::unread))
        .route("/messages/:message_id/read", post(messages::mark_read))
}

fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(groups::create))
        .route("/groups/my", get(groups::my_groups))
        .route("/groups/:group_id/members", post(groups::add_members))
        .route(
            "/groups/:group_id/members/:user_id",
            delete(groups::remove_member),
        )
        .route("/groups/:group_id/messages", get(groups::messages))
}
