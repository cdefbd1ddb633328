//! Group message handler
//!
//! The row is written once, then members (minus the sender) are
//! partitioned by presence: online members get the frame on every live
//! socket, offline members get a queue entry. One slow recipient never
//! aborts the send.

use std::sync::Arc;
use uuid::Uuid;

use courier_cache::OfflineEntry;
use courier_core::{validate_content, DomainError, GroupMessage};

use crate::gateway::connection::Connection;
use crate::gateway::protocol::{AckStatus, ServerFrame};
use crate::state::AppState;

use super::{HandlerError, HandlerResult};

pub async fn handle(
    state: &AppState,
    conn: &Arc<Connection>,
    group_id: Uuid,
    content: String,
    message_type: String,
) -> HandlerResult<()> {
    let sender_id = conn.user_id();

    validate_content(&content)?;

    if !state
        .services()
        .group_repo()
        .is_member(group_id, sender_id)
        .await?
    {
        return Err(DomainError::NotGroupMember.into());
    }

    let message = GroupMessage::new(group_id, sender_id, content, message_type);
    let message_id = message.message_id;

    // One row regardless of member count; fan-out only proceeds once it
    // is durable
    if let Err(e) = state.services().group_message_repo().insert(&message).await {
        tracing::error!(message_id = %message_id, error = %e, "Failed to persist group message");
        let _ = conn
            .send(ServerFrame::ack_error(message_id, "PERSIST_FAILED"))
            .await;
        return Ok(());
    }

    // The sender is excluded from fan-out entirely, other devices
    // included; their history endpoint shows the echo
    let members: Vec<Uuid> = state
        .services()
        .group_repo()
        .member_ids(group_id)
        .await?
        .into_iter()
        .filter(|id| *id != sender_id)
        .collect();

    let (online, offline) = state
        .services()
        .presence_store()
        .partition_online(&members)
        .await
        .map_err(|e| HandlerError::from(DomainError::Cache(e.to_string())))?;

    let frame = ServerFrame::GroupMessageNew {
        message_id,
        group_id,
        sender_id,
        content: message.content.clone(),
        message_type: message.message_type.clone(),
        created_at: message.created_at,
    };

    let mut delivered_sockets = 0;
    for member_id in &online {
        delivered_sockets += state.registry().send_to_user(*member_id, &frame);
    }

    for member_id in &offline {
        if let Err(e) = state
            .services()
            .offline_queue()
            .enqueue(*member_id, &OfflineEntry::group(message_id))
            .await
        {
            tracing::warn!(
                message_id = %message_id,
                member_id = %member_id,
                error = %e,
                "Failed to queue group message"
            );
        }
    }

    let _ = conn
        .send(ServerFrame::ack(message_id, AckStatus::Delivered))
        .await;

    tracing::debug!(
        message_id = %message_id,
        group_id = %group_id,
        online = online.len(),
        offline = offline.len(),
        sockets = delivered_sockets,
        "Group message fanned out"
    );

    Ok(())
}
