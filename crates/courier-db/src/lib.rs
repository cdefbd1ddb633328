//! # courier-db
//!
//! Durable log store: PostgreSQL implementations of the repository
//! traits defined in `courier-core`, via SQLx. Parameterized queries
//! only.

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{
    PgDirectMessageRepository, PgGroupMessageRepository, PgGroupRepository,
    PgRefreshTokenRepository, PgUserRepository,
};
