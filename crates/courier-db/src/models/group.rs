//! Group table models

use chrono::{DateTime, Utc};
use courier_core::{Group, GroupMember, GroupMemberRole, GroupMessage, UserGroup};
use sqlx::FromRow;
use uuid::Uuid;

/// Row model for the `groups` table
#[derive(Debug, Clone, FromRow)]
pub struct GroupModel {
    pub group_id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<GroupModel> for Group {
    fn from(model: GroupModel) -> Self {
        Self {
            group_id: model.group_id,
            name: model.name,
            creator_id: model.creator_id,
            created_at: model.created_at,
        }
    }
}

/// Row model for the `group_members` table
#[derive(Debug, Clone, FromRow)]
pub struct GroupMemberModel {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl From<GroupMemberModel> for GroupMember {
    fn from(model: GroupMemberModel) -> Self {
        Self {
            group_id: model.group_id,
            user_id: model.user_id,
            role: model.role.parse().unwrap_or(GroupMemberRole::Member),
            joined_at: model.joined_at,
        }
    }
}

/// Row model for the `group_messages` table
#[derive(Debug, Clone, FromRow)]
pub struct GroupMessageModel {
    pub message_id: Uuid,
    pub group_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<GroupMessageModel> for GroupMessage {
    fn from(model: GroupMessageModel) -> Self {
        Self {
            message_id: model.message_id,
            group_id: model.group_id,
            sender_id: model.sender_id,
            content: model.content,
            message_type: model.message_type,
            created_at: model.created_at,
        }
    }
}

/// Row model for the groups-of-a-user query (group + membership view)
#[derive(Debug, Clone, FromRow)]
pub struct UserGroupModel {
    pub group_id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub role: String,
    pub member_count: i64,
}

impl From<UserGroupModel> for UserGroup {
    fn from(model: UserGroupModel) -> Self {
        Self {
            group: Group {
                group_id: model.group_id,
                name: model.name,
                creator_id: model.creator_id,
                created_at: model.created_at,
            },
            role: model.role.parse().unwrap_or(GroupMemberRole::Member),
            member_count: model.member_count,
        }
    }
}
