//! Direct message table models

use chrono::{DateTime, Utc};
use courier_core::{ConversationSummary, DirectMessage};
use sqlx::FromRow;
use uuid::Uuid;

/// Row model for the `messages` table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub message_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<MessageModel> for DirectMessage {
    fn from(model: MessageModel) -> Self {
        Self {
            message_id: model.message_id,
            sender_id: model.sender_id,
            recipient_id: model.recipient_id,
            content: model.content,
            message_type: model.message_type,
            created_at: model.created_at,
            delivered_at: model.delivered_at,
            read_at: model.read_at,
        }
    }
}

/// Row model for the conversations overview query
#[derive(Debug, Clone, FromRow)]
pub struct ConversationSummaryModel {
    pub peer_id: Uuid,
    pub peer_username: String,
    pub peer_display_name: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub last_message_sender_id: Uuid,
    pub unread_count: i64,
}

impl From<ConversationSummaryModel> for ConversationSummary {
    fn from(model: ConversationSummaryModel) -> Self {
        Self {
            peer_id: model.peer_id,
            peer_username: model.peer_username,
            peer_display_name: model.peer_display_name,
            last_message: model.last_message,
            last_message_at: model.last_message_at,
            last_message_sender_id: model.last_message_sender_id,
            unread_count: model.unread_count,
        }
    }
}
