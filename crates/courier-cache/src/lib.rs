//! # courier-cache
//!
//! Redis layer: presence keys, per-user offline queues, and the
//! password-reset token store.
//!
//! The cache is a derived view; the durable log remains the source of
//! truth. Losing a cache entry can delay delivery but never loses a
//! message.

pub mod keys;
pub mod pool;
pub mod presence;
pub mod queue;
pub mod tokens;

// Re-export commonly used types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use presence::PresenceStore;
pub use queue::{OfflineEntry, OfflineKind, OfflineQueueStore};
pub use tokens::ResetTokenStore;
