//! Direct message handler
//!
//! Online recipients get the frame fanned out before the log write; the
//! write then runs in the background with `delivered_at = created_at`.
//! Offline recipients get a synchronous log write followed by a queue
//! push. Both branches leave exactly one row in the log.

use std::sync::Arc;
use uuid::Uuid;

use courier_cache::OfflineEntry;
use courier_core::{validate_content, DirectMessage, DomainError};

use crate::gateway::connection::Connection;
use crate::gateway::protocol::{AckStatus, ServerFrame};
use crate::state::AppState;

use super::{HandlerError, HandlerResult};

pub async fn handle(
    state: &AppState,
    conn: &Arc<Connection>,
    recipient_id: Uuid,
    content: String,
    message_type: String,
) -> HandlerResult<()> {
    let sender_id = conn.user_id();

    if recipient_id == sender_id {
        return Err(DomainError::SelfMessage.into());
    }
    validate_content(&content)?;

    if !state.services().user_repo().exists(recipient_id).await? {
        return Err(DomainError::UserNotFound(recipient_id).into());
    }

    let mut message = DirectMessage::new(sender_id, recipient_id, content, message_type);
    let message_id = message.message_id;

    let recipient_online = state
        .services()
        .presence_store()
        .is_online(recipient_id)
        .await
        .map_err(|e| HandlerError::from(DomainError::Cache(e.to_string())))?;

    if recipient_online {
        let frame = ServerFrame::MessageNew {
            message_id,
            sender_id,
            sender_username: conn.username().to_string(),
            recipient_id,
            content: message.content.clone(),
            message_type: message.message_type.clone(),
            created_at: message.created_at,
        };
        let sent = state.registry().send_to_user(recipient_id, &frame);

        // Ack follows fan-out; persistence is fire-and-forget with a
        // follow-up error ack when the write fails. The recipient may
        // already hold the frame at that point: at-least-once, clients
        // dedupe by message_id.
        let _ = conn
            .send(ServerFrame::ack(message_id, AckStatus::Delivered))
            .await;

        message.delivered_at = Some(message.created_at);
        let services = state.services().clone();
        let sender_conn = conn.clone();
        tokio::spawn(async move {
            if let Err(e) = services.message_repo().insert(&message).await {
                tracing::error!(
                    message_id = %message_id,
                    error = %e,
                    "Failed to persist delivered message"
                );
                let _ = sender_conn.try_send(ServerFrame::ack_error(message_id, "PERSIST_FAILED"));
            }
        });

        tracing::debug!(
            message_id = %message_id,
            recipient_id = %recipient_id,
            sockets = sent,
            "Direct message delivered"
        );
    } else {
        // Offline: the row must exist before the queue references it
        if let Err(e) = state.services().message_repo().insert(&message).await {
            tracing::error!(message_id = %message_id, error = %e, "Failed to persist message");
            let _ = conn
                .send(ServerFrame::ack_error(message_id, "PERSIST_FAILED"))
                .await;
            return Ok(());
        }

        if let Err(e) = state
            .services()
            .offline_queue()
            .enqueue(recipient_id, &OfflineEntry::direct(message_id))
            .await
        {
            // The message is durable; the recipient can still recover it
            // through the history endpoint
            tracing::warn!(message_id = %message_id, error = %e, "Failed to queue offline message");
        }

        let _ = conn
            .send(ServerFrame::ack(message_id, AckStatus::Queued))
            .await;

        tracing::debug!(
            message_id = %message_id,
            recipient_id = %recipient_id,
            "Direct message queued for offline recipient"
        );
    }

    Ok(())
}
