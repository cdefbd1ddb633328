//! Response DTOs

use chrono::{DateTime, Utc};
use courier_core::{
    ConversationSummary, DirectMessage, GroupMemberRole, GroupMessage, User, UserGroup, UserRole,
};
use serde::Serialize;
use uuid::Uuid;

/// Public view of a user account
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name().to_string(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Signup / login / refresh response
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Session check response
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl SessionResponse {
    #[must_use]
    pub fn valid(user: &User) -> Self {
        Self {
            valid: true,
            user: Some(UserResponse::from(user)),
        }
    }

    #[must_use]
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user: None,
        }
    }
}

/// Username lookup response
#[derive(Debug, Clone, Serialize)]
pub struct LookupUserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
}

impl From<&User> for LookupUserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            display_name: user.display_name().to_string(),
        }
    }
}

/// Direct message as returned by history endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
}

impl From<DirectMessage> for MessageResponse {
    fn from(msg: DirectMessage) -> Self {
        Self {
            message_id: msg.message_id,
            sender_id: msg.sender_id,
            recipient_id: msg.recipient_id,
            content: msg.content,
            message_type: msg.message_type,
            created_at: msg.created_at,
            delivered_at: msg.delivered_at,
            read_at: msg.read_at,
        }
    }
}

/// One row of the conversations overview
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummaryResponse {
    pub peer_id: Uuid,
    pub peer_username: String,
    pub peer_display_name: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub last_message_sender_id: Uuid,
    pub unread_count: i64,
}

impl From<ConversationSummary> for ConversationSummaryResponse {
    fn from(summary: ConversationSummary) -> Self {
        Self {
            peer_id: summary.peer_id,
            peer_username: summary.peer_username,
            peer_display_name: summary.peer_display_name,
            last_message: summary.last_message,
            last_message_at: summary.last_message_at,
            last_message_sender_id: summary.last_message_sender_id,
            unread_count: summary.unread_count,
        }
    }
}

/// Group details
#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub group_id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&courier_core::Group> for GroupResponse {
    fn from(group: &courier_core::Group) -> Self {
        Self {
            group_id: group.group_id,
            name: group.name.clone(),
            creator_id: group.creator_id,
            created_at: group.created_at,
        }
    }
}

/// A group as seen by one of its members
#[derive(Debug, Clone, Serialize)]
pub struct UserGroupResponse {
    pub group_id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub role: GroupMemberRole,
    pub member_count: i64,
}

impl From<UserGroup> for UserGroupResponse {
    fn from(ug: UserGroup) -> Self {
        Self {
            group_id: ug.group.group_id,
            name: ug.group.name,
            creator_id: ug.group.creator_id,
            created_at: ug.group.created_at,
            role: ug.role,
            member_count: ug.member_count,
        }
    }
}

/// Group message as returned by history endpoints
#[derive(Debug, Clone, Serialize)]
pub struct GroupMessageResponse {
    pub message_id: Uuid,
    pub group_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<GroupMessage> for GroupMessageResponse {
    fn from(msg: GroupMessage) -> Self {
        Self {
            message_id: msg.message_id,
            group_id: msg.group_id,
            sender_id: msg.sender_id,
            content: msg.content,
            message_type: msg.message_type,
            created_at: msg.created_at,
        }
    }
}

/// The result of marking a message read: who to notify, and when it
/// was read. `None` from the service means no transition happened.
#[derive(Debug, Clone, Serialize)]
pub struct ReadReceipt {
    pub message_id: Uuid,
    pub reader_id: Uuid,
    pub sender_id: Uuid,
    pub read_at: DateTime<Utc>,
}
