//! Repository trait definitions
//!
//! These traits define the persistence contract for the durable log.
//! Implementations live in `courier-db`; services depend only on the
//! traits so tests can substitute in-memory fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    ConversationSummary, DirectMessage, Group, GroupMember, GroupMemberRole, GroupMessage, User,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// A group together with the requesting user's membership view
#[derive(Debug, Clone)]
pub struct UserGroup {
    pub group: Group,
    pub role: GroupMemberRole,
    pub member_count: i64,
}

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Uniqueness collisions surface as
    /// `DomainError::UsernameTaken` / `DomainError::EmailTaken`.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Look up by username *or* email (login form accepts either)
    async fn find_by_login(&self, login: &str) -> RepoResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Cheap existence check used by the router before accepting a message
    async fn exists(&self, id: Uuid) -> RepoResult<bool>;

    async fn password_hash(&self, id: Uuid) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> RepoResult<()>;

    /// Delete a user; messages, memberships and tokens cascade
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

/// Direct message persistence
#[async_trait]
pub trait DirectMessageRepository: Send + Sync {
    async fn insert(&self, message: &DirectMessage) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<DirectMessage>>;

    /// Batch fetch; result order is unspecified, callers re-order
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<DirectMessage>>;

    /// Messages between two users, newest first
    async fn conversation(
        &self,
        user_id: Uuid,
        peer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<DirectMessage>>;

    async fn conversation_count(&self, user_id: Uuid, peer_id: Uuid) -> RepoResult<i64>;

    /// One row per conversation partner with preview and unread count
    async fn conversations_summary(&self, user_id: Uuid) -> RepoResult<Vec<ConversationSummary>>;

    /// All unread messages addressed to the user, newest first
    async fn unread_for(&self, user_id: Uuid) -> RepoResult<Vec<DirectMessage>>;

    /// Set `delivered_at = NOW()` where still null; returns affected rows
    async fn mark_delivered(&self, ids: &[Uuid]) -> RepoResult<u64>;

    /// Set `read_at = NOW()` when the caller is the recipient and the
    /// message is still unread. Returns the new `read_at` only on an
    /// actual transition, so duplicate receipts are detectable.
    async fn mark_read(
        &self,
        message_id: Uuid,
        recipient_id: Uuid,
    ) -> RepoResult<Option<DateTime<Utc>>>;

    async fn sender_of(&self, message_id: Uuid) -> RepoResult<Option<Uuid>>;
}

/// Group and membership persistence
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Insert the group and its creator as an admin member, atomically
    async fn create(&self, group: &Group) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Group>>;

    /// Returns false when the user was already a member
    async fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        role: GroupMemberRole,
    ) -> RepoResult<bool>;

    async fn remove_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    async fn member_ids(&self, group_id: Uuid) -> RepoResult<Vec<Uuid>>;

    async fn members(&self, group_id: Uuid) -> RepoResult<Vec<GroupMember>>;

    async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    async fn member_role(&self, group_id: Uuid, user_id: Uuid)
        -> RepoResult<Option<GroupMemberRole>>;

    async fn groups_for_user(&self, user_id: Uuid) -> RepoResult<Vec<UserGroup>>;
}

/// Group message persistence
#[async_trait]
pub trait GroupMessageRepository: Send + Sync {
    async fn insert(&self, message: &GroupMessage) -> RepoResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<GroupMessage>>;

    /// Batch fetch; result order is unspecified, callers re-order
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<GroupMessage>>;

    /// Messages of a group, newest first
    async fn for_group(
        &self,
        group_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<GroupMessage>>;

    async fn count_for_group(&self, group_id: Uuid) -> RepoResult<i64>;

    /// Upsert the per-recipient read row; returns true only when the
    /// row was newly inserted
    async fn mark_read(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<bool>;

    async fn sender_of(&self, message_id: Uuid) -> RepoResult<Option<Uuid>>;
}

/// Refresh token persistence
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()>;

    /// Atomically revoke an unrevoked, unexpired token and return its
    /// owner. Exactly one of any number of concurrent callers presenting
    /// the same token observes `Some`; the rest observe `None`.
    async fn consume(&self, token_hash: &str) -> RepoResult<Option<Uuid>>;

    /// Revoke without rotation (logout). Idempotent: revoking an already
    /// revoked or unknown token returns false.
    async fn revoke(&self, token_hash: &str) -> RepoResult<bool>;

    /// Revoke every live token of a user; returns the number revoked
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64>;
}
