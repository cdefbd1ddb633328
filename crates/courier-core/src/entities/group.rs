//! Group, membership and group message entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum group name length in characters
pub const MAX_GROUP_NAME_LEN: usize = 100;

/// A chat group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub group_id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group with a fresh id
    pub fn new(name: String, creator_id: Uuid) -> Self {
        Self {
            group_id: Uuid::new_v4(),
            name,
            creator_id,
            created_at: Utc::now(),
        }
    }
}

/// Role of a member within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupMemberRole {
    #[default]
    Member,
    Admin,
}

impl GroupMemberRole {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for GroupMemberRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            other => Err(DomainError::Validation(format!(
                "unknown group role: {other}"
            ))),
        }
    }
}

/// Membership row; composite key (group_id, user_id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: GroupMemberRole,
    pub joined_at: DateTime<Utc>,
}

/// A message sent to a group; stored once regardless of member count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMessage {
    pub message_id: Uuid,
    pub group_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
}

impl GroupMessage {
    /// Create a new group message with a fresh id
    pub fn new(group_id: Uuid, sender_id: Uuid, content: String, message_type: String) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            group_id,
            sender_id,
            content,
            message_type,
            created_at: Utc::now(),
        }
    }
}

/// Per-recipient read state for a group message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMessageRead {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub read_at: DateTime<Utc>,
}

/// Validate a group name (1 to `MAX_GROUP_NAME_LEN` characters)
///
/// # Errors
/// Returns a validation error when empty or over the limit.
pub fn validate_group_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "group name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_GROUP_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "group name must be at most {MAX_GROUP_NAME_LEN} characters"
        )));
    }
    Ok(())
}
