//! Read receipt handler
//!
//! Direct: the guarded update only fires for the recipient on an unread
//! message, so duplicate receipts notify the sender exactly once.
//! Group: per-reader upsert; the original sender is notified when the
//! row is new.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use courier_core::DomainError;

use crate::gateway::connection::Connection;
use crate::gateway::protocol::ServerFrame;
use crate::state::AppState;

use super::HandlerResult;

pub async fn handle(
    state: &AppState,
    conn: &Arc<Connection>,
    message_id: Uuid,
) -> HandlerResult<()> {
    let reader_id = conn.user_id();
    let services = state.services();

    // Direct message path
    if let Some(read_at) = services
        .message_repo()
        .mark_read(message_id, reader_id)
        .await?
    {
        let sender_id = services
            .message_repo()
            .sender_of(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound(message_id))?;

        state.registry().send_to_user(
            sender_id,
            &ServerFrame::MessageRead {
                message_id,
                reader_id,
                read_at,
            },
        );
        return Ok(());
    }

    // No transition: either already read / not the recipient, or this is
    // a group message id
    if services.message_repo().find_by_id(message_id).await?.is_some() {
        return Ok(());
    }

    let group_message = services
        .group_message_repo()
        .find_by_id(message_id)
        .await?
        .ok_or(DomainError::MessageNotFound(message_id))?;

    if !services
        .group_repo()
        .is_member(group_message.group_id, reader_id)
        .await?
    {
        return Err(DomainError::NotGroupMember.into());
    }

    let newly_read = services
        .group_message_repo()
        .mark_read(message_id, reader_id)
        .await?;

    if newly_read && group_message.sender_id != reader_id {
        state.registry().send_to_user(
            group_message.sender_id,
            &ServerFrame::MessageRead {
                message_id,
                reader_id,
                read_at: Utc::now(),
            },
        );
    }

    Ok(())
}
