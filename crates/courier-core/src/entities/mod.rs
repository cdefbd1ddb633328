//! Domain entities

mod group;
mod message;
mod token;
mod user;

pub use group::{
    validate_group_name, Group, GroupMember, GroupMemberRole, GroupMessage, GroupMessageRead,
    MAX_GROUP_NAME_LEN,
};
pub use message::{validate_content, ConversationSummary, DirectMessage, MAX_CONTENT_LEN};
pub use token::RefreshToken;
pub use user::{validate_username, User, UserRole, MAX_USERNAME_LEN, MIN_USERNAME_LEN};
