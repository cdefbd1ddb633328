//! # courier-core
//!
//! Domain layer containing entities, domain errors, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{
    validate_content, validate_group_name, validate_username, ConversationSummary, DirectMessage,
    Group, GroupMember, GroupMemberRole, GroupMessage, GroupMessageRead, RefreshToken, User,
    UserRole, MAX_CONTENT_LEN, MAX_GROUP_NAME_LEN, MAX_USERNAME_LEN, MIN_USERNAME_LEN,
};
pub use error::DomainError;
pub use traits::{
    DirectMessageRepository, GroupMessageRepository, GroupRepository, RefreshTokenRepository,
    RepoResult, UserGroup, UserRepository,
};
