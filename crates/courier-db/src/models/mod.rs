//! Database row models with SQLx `FromRow` derives
//!
//! Models mirror table shapes; `From` impls map them onto the domain
//! entities.

mod group;
mod message;
mod refresh_token;
mod user;

pub use group::{GroupMemberModel, GroupMessageModel, GroupModel, UserGroupModel};
pub use message::{ConversationSummaryModel, MessageModel};
pub use refresh_token::RefreshTokenModel;
pub use user::UserModel;
