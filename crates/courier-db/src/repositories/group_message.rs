//! PostgreSQL implementation of GroupMessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{GroupMessage, GroupMessageRepository, RepoResult};

use crate::models::GroupMessageModel;

use super::error::map_db_error;

const GROUP_MESSAGE_COLUMNS: &str =
    "message_id, group_id, sender_id, content, message_type, created_at";

/// PostgreSQL implementation of GroupMessageRepository
#[derive(Clone)]
pub struct PgGroupMessageRepository {
    pool: PgPool,
}

impl PgGroupMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupMessageRepository for PgGroupMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.message_id))]
    async fn insert(&self, message: &GroupMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO group_messages (message_id, group_id, sender_id, content, message_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(message.message_id)
        .bind(message.group_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(&message.message_type)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<GroupMessage>> {
        let result = sqlx::query_as::<_, GroupMessageModel>(&format!(
            "SELECT {GROUP_MESSAGE_COLUMNS} FROM group_messages WHERE message_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GroupMessage::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<GroupMessage>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, GroupMessageModel>(&format!(
            "SELECT {GROUP_MESSAGE_COLUMNS} FROM group_messages WHERE message_id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(GroupMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn for_group(
        &self,
        group_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<GroupMessage>> {
        let rows = sqlx::query_as::<_, GroupMessageModel>(&format!(
            r"
            SELECT {GROUP_MESSAGE_COLUMNS}
            FROM group_messages
            WHERE group_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(GroupMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_for_group(&self, group_id: Uuid) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM group_messages WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, message_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r"
            INSERT INTO group_message_reads (message_id, user_id, read_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (message_id, user_id) DO NOTHING
            RETURNING message_id
            ",
        )
        .bind(message_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(inserted.is_some())
    }

    #[instrument(skip(self))]
    async fn sender_of(&self, message_id: Uuid) -> RepoResult<Option<Uuid>> {
        let sender = sqlx::query_scalar::<_, Uuid>(
            "SELECT sender_id FROM group_messages WHERE message_id = $1",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(sender)
    }
}
