//! Offline queue storage in Redis.
//!
//! Each queued record is a small reference ({message_id, kind}); the
//! canonical message content lives in the durable log. Entries are
//! RPUSH'd so a full LRANGE reads oldest first, which is the replay
//! order.

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys;
use crate::pool::{RedisPool, RedisResult};

/// Which log a queued message id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfflineKind {
    Direct,
    Group,
}

/// One queued record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineEntry {
    pub message_id: Uuid,
    pub kind: OfflineKind,
}

impl OfflineEntry {
    #[must_use]
    pub fn direct(message_id: Uuid) -> Self {
        Self {
            message_id,
            kind: OfflineKind::Direct,
        }
    }

    #[must_use]
    pub fn group(message_id: Uuid) -> Self {
        Self {
            message_id,
            kind: OfflineKind::Group,
        }
    }
}

/// Offline queue store
#[derive(Debug, Clone)]
pub struct OfflineQueueStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl OfflineQueueStore {
    /// Create a queue store with the default TTL
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: keys::DEFAULT_OFFLINE_QUEUE_TTL,
        }
    }

    /// Create with a custom TTL
    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    /// Append an entry to a user's queue and refresh the queue TTL
    pub async fn enqueue(&self, user_id: Uuid, entry: &OfflineEntry) -> RedisResult<()> {
        let key = keys::offline_queue(user_id);
        let payload = serde_json::to_string(entry)?;

        let mut conn = self.pool.get().await?;
        let mut pipe = redis::pipe();
        pipe.rpush(&key, payload)
            .ignore()
            .expire(&key, self.ttl_seconds as i64)
            .ignore();
        pipe.query_async::<()>(&mut conn).await?;

        tracing::debug!(
            user_id = %user_id,
            message_id = %entry.message_id,
            kind = ?entry.kind,
            "Queued offline message"
        );

        Ok(())
    }

    /// Atomically snapshot and clear a user's queue, returning the
    /// entries oldest first.
    ///
    /// The queue key is RENAMEd to a unique work key before reading, so
    /// a concurrent enqueue lands on a fresh queue and is picked up by
    /// the next drain instead of being lost.
    pub async fn drain(&self, user_id: Uuid) -> RedisResult<Vec<OfflineEntry>> {
        let key = keys::offline_queue(user_id);
        let work_key = keys::offline_queue_work(user_id, Uuid::new_v4());

        let mut conn = self.pool.get().await?;

        // RENAME fails with "no such key" when the queue is empty
        let renamed: Result<(), redis::RedisError> =
            conn.rename(&key, &work_key).await;
        if renamed.is_err() {
            return Ok(Vec::new());
        }

        let raw: Vec<String> = conn.lrange(&work_key, 0, -1).await?;
        conn.del::<_, ()>(&work_key).await?;

        let mut entries = Vec::with_capacity(raw.len());
        for item in raw {
            match serde_json::from_str::<OfflineEntry>(&item) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Dropping malformed queue entry");
                }
            }
        }

        Ok(entries)
    }

    /// Queue length without draining (used by tests and diagnostics)
    pub async fn len(&self, user_id: Uuid) -> RedisResult<usize> {
        let mut conn = self.pool.get().await?;
        let len: usize = conn.llen(keys::offline_queue(user_id)).await?;
        Ok(len)
    }
}
