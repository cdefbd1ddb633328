//! Password-reset token storage in Redis.
//!
//! Keys are the SHA-256 of the opaque token; the value is the owning
//! user id. GETDEL on redemption makes each token single-use.

use redis::AsyncCommands;
use uuid::Uuid;

use crate::keys;
use crate::pool::{RedisPool, RedisResult};

/// Reset token store
#[derive(Debug, Clone)]
pub struct ResetTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl ResetTokenStore {
    /// Create a reset token store with the default 1 hour TTL
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: keys::DEFAULT_RESET_TOKEN_TTL,
        }
    }

    /// Create with a custom TTL
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    /// Store a hashed token for a user with the configured TTL
    pub async fn store(&self, token_hash: &str, user_id: Uuid) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(
            keys::reset_token(token_hash),
            user_id.to_string(),
            self.ttl_seconds,
        )
        .await?;
        Ok(())
    }

    /// Atomically consume a hashed token, returning its owner.
    ///
    /// The key is deleted in the same operation (GETDEL), so a second
    /// redemption of the same token observes `None`.
    pub async fn consume(&self, token_hash: &str) -> RedisResult<Option<Uuid>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get_del(keys::reset_token(token_hash)).await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }
}
