//! Direct message service
//!
//! History queries and read-state transitions over the durable log.
//! The realtime send path lives in the gateway router; both share the
//! repositories.

use tracing::instrument;
use uuid::Uuid;

use courier_common::AppError;
use courier_core::DomainError;

use crate::dto::{ConversationSummaryResponse, MessageResponse, ReadReceipt};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Direct message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// One row per conversation partner with preview and unread count
    #[instrument(skip(self))]
    pub async fn conversations(
        &self,
        user_id: Uuid,
    ) -> ServiceResult<Vec<ConversationSummaryResponse>> {
        let summaries = self.ctx.message_repo().conversations_summary(user_id).await?;
        Ok(summaries
            .into_iter()
            .map(ConversationSummaryResponse::from)
            .collect())
    }

    /// Page of the conversation with one peer, newest first, plus the
    /// total message count for pagination
    #[instrument(skip(self))]
    pub async fn conversation(
        &self,
        user_id: Uuid,
        peer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> ServiceResult<(Vec<MessageResponse>, i64)> {
        if !self.ctx.user_repo().exists(peer_id).await? {
            return Err(DomainError::UserNotFound(peer_id).into());
        }

        let messages = self
            .ctx
            .message_repo()
            .conversation(user_id, peer_id, limit, offset)
            .await?;
        let total = self
            .ctx
            .message_repo()
            .conversation_count(user_id, peer_id)
            .await?;

        Ok((
            messages.into_iter().map(MessageResponse::from).collect(),
            total,
        ))
    }

    /// Unread messages addressed to the user, newest first
    #[instrument(skip(self))]
    pub async fn unread(&self, user_id: Uuid) -> ServiceResult<Vec<MessageResponse>> {
        let messages = self.ctx.message_repo().unread_for(user_id).await?;
        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    /// Mark a direct message read by its recipient.
    ///
    /// Returns `Some` only on an actual unread→read transition, carrying
    /// everything needed to notify the sender. A repeat call returns
    /// `None` so duplicate receipts produce no second notification.
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        message_id: Uuid,
        reader_id: Uuid,
    ) -> ServiceResult<Option<ReadReceipt>> {
        let Some(read_at) = self
            .ctx
            .message_repo()
            .mark_read(message_id, reader_id)
            .await?
        else {
            // Distinguish "no such message" from "already read / not the
            // recipient" for the REST surface
            if self.ctx.message_repo().find_by_id(message_id).await?.is_none() {
                return Err(DomainError::MessageNotFound(message_id).into());
            }
            return Ok(None);
        };

        let sender_id = self
            .ctx
            .message_repo()
            .sender_of(message_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("message {message_id}")))?;

        Ok(Some(ReadReceipt {
            message_id,
            reader_id,
            sender_id,
            read_at,
        }))
    }
}
