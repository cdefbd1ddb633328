//! User presence storage in Redis.
//!
//! A short-TTL key per user signals at least one live socket somewhere.
//! The connection registry is the authority for "deliverable right now
//! on this node"; this store is the derived, TTL-bounded view the
//! router consults for the deliver-vs-queue decision.

use redis::AsyncCommands;
use uuid::Uuid;

use crate::keys;
use crate::pool::{RedisPool, RedisResult};

/// Presence store
#[derive(Debug, Clone)]
pub struct PresenceStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl PresenceStore {
    /// Create a presence store with the default heartbeat TTL
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: keys::DEFAULT_HEARTBEAT_TTL,
        }
    }

    /// Create with a custom TTL
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    /// Mark a user online; also refreshes the TTL (heartbeat)
    pub async fn set_online(&self, user_id: Uuid) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(keys::user_online(user_id), "1", self.ttl_seconds)
            .await?;
        Ok(())
    }

    /// Delete the presence key (last socket gone)
    pub async fn set_offline(&self, user_id: Uuid) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.del::<_, ()>(keys::user_online(user_id)).await?;
        Ok(())
    }

    /// Check whether a user currently has a live presence key
    pub async fn is_online(&self, user_id: Uuid) -> RedisResult<bool> {
        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(keys::user_online(user_id)).await?;
        Ok(exists)
    }

    /// Partition users into (online, offline) with one pipelined round trip
    pub async fn partition_online(
        &self,
        user_ids: &[Uuid],
    ) -> RedisResult<(Vec<Uuid>, Vec<Uuid>)> {
        if user_ids.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let mut conn = self.pool.get().await?;
        let mut pipe = redis::pipe();
        for user_id in user_ids {
            pipe.exists(keys::user_online(*user_id));
        }
        let flags: Vec<bool> = pipe.query_async(&mut conn).await?;

        let mut online = Vec::new();
        let mut offline = Vec::new();
        for (user_id, is_online) in user_ids.iter().zip(flags) {
            if is_online {
                online.push(*user_id);
            } else {
                offline.push(*user_id);
            }
        }

        Ok((online, offline))
    }
}
