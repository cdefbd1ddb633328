//! PostgreSQL repository implementations

mod error;
mod group;
mod group_message;
mod message;
mod refresh_token;
mod user;

pub use group::PgGroupRepository;
pub use group_message::PgGroupMessageRepository;
pub use message::PgDirectMessageRepository;
pub use refresh_token::PgRefreshTokenRepository;
pub use user::PgUserRepository;
