//! Direct message entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum message content length in characters
pub const MAX_CONTENT_LEN: usize = 10_000;

/// A one-to-one message between two users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub message_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl DirectMessage {
    /// Create a new message with a fresh id, stamped at the server clock
    pub fn new(sender_id: Uuid, recipient_id: Uuid, content: String, message_type: String) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            content,
            message_type,
            created_at: Utc::now(),
            delivered_at: None,
            read_at: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.delivered_at.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// One row of the conversations overview: a peer, the last exchanged
/// message, and how many of their messages are still unread.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub peer_id: Uuid,
    pub peer_username: String,
    pub peer_display_name: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub last_message_sender_id: Uuid,
    pub unread_count: i64,
}

/// Validate message content bounds (1 to `MAX_CONTENT_LEN` characters)
///
/// # Errors
/// Returns a validation error when empty or over the limit.
pub fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.is_empty() {
        return Err(DomainError::Validation(
            "message content cannot be empty".to_string(),
        ));
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_LEN {
        return Err(DomainError::ContentTooLong { max: MAX_CONTENT_LEN });
    }
    Ok(())
}
