//! Offline replay
//!
//! Runs once per successful registration, before the socket enters the
//! dispatch loop. The queue is drained atomically; referenced messages
//! are hydrated from the log per kind, re-assembled in queue order
//! (oldest first) and delivered as one batch frame. Direct messages are
//! then marked delivered in a single statement.
//!
//! If the batch fails to send after the drain, the queue entries are
//! lost but the rows remain in the log; the client recovers through the
//! history endpoints.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use courier_cache::OfflineKind;
use courier_common::AppError;

use super::connection::Connection;
use super::protocol::{OfflineMessage, ServerFrame};
use crate::state::AppState;

pub async fn replay_offline(state: &AppState, conn: &Arc<Connection>) -> Result<(), AppError> {
    let user_id = conn.user_id();
    let services = state.services();

    let entries = services
        .offline_queue()
        .drain(user_id)
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;

    if entries.is_empty() {
        return Ok(());
    }

    let direct_ids: Vec<Uuid> = entries
        .iter()
        .filter(|e| e.kind == OfflineKind::Direct)
        .map(|e| e.message_id)
        .collect();
    let group_ids: Vec<Uuid> = entries
        .iter()
        .filter(|e| e.kind == OfflineKind::Group)
        .map(|e| e.message_id)
        .collect();

    // One query per kind, then re-assemble in queue order
    let direct_by_id: HashMap<Uuid, _> = services
        .message_repo()
        .find_many(&direct_ids)
        .await?
        .into_iter()
        .map(|m| (m.message_id, m))
        .collect();
    let group_by_id: HashMap<Uuid, _> = services
        .group_message_repo()
        .find_many(&group_ids)
        .await?
        .into_iter()
        .map(|m| (m.message_id, m))
        .collect();

    let mut messages = Vec::with_capacity(entries.len());
    for entry in &entries {
        match entry.kind {
            OfflineKind::Direct => {
                if let Some(msg) = direct_by_id.get(&entry.message_id) {
                    messages.push(OfflineMessage::from(msg.clone()));
                }
            }
            OfflineKind::Group => {
                if let Some(msg) = group_by_id.get(&entry.message_id) {
                    messages.push(OfflineMessage::from(msg.clone()));
                }
            }
        }
    }

    if messages.is_empty() {
        return Ok(());
    }

    let count = messages.len();
    conn.send(ServerFrame::OfflineBatch { messages, count })
        .await
        .map_err(|_| AppError::internal(anyhow::anyhow!("socket closed during replay")))?;

    // Inclusion in the batch counts as delivery for direct messages
    services.message_repo().mark_delivered(&direct_ids).await?;

    tracing::info!(user_id = %user_id, count, "Replayed offline messages");

    Ok(())
}
