//! Heartbeat handler
//!
//! Refreshes the presence key TTL and answers with pong. Absence of
//! pings lets the key expire naturally.

use chrono::Utc;
use std::sync::Arc;

use crate::gateway::connection::Connection;
use crate::gateway::protocol::ServerFrame;
use crate::state::AppState;

use super::HandlerResult;

pub async fn handle(state: &AppState, conn: &Arc<Connection>) -> HandlerResult<()> {
    // A cache hiccup must not kill a live socket; the presence key
    // recovers on the next ping
    if let Err(e) = state
        .services()
        .presence_store()
        .set_online(conn.user_id())
        .await
    {
        tracing::warn!(user_id = %conn.user_id(), error = %e, "Failed to refresh presence");
    }

    let _ = conn
        .send(ServerFrame::Pong {
            timestamp: Utc::now(),
        })
        .await;

    Ok(())
}
