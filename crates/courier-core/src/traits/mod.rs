//! Repository traits implemented by the storage layer

mod repositories;

pub use repositories::{
    DirectMessageRepository, GroupMessageRepository, GroupRepository, RefreshTokenRepository,
    RepoResult, UserGroup, UserRepository,
};
