//! PostgreSQL implementation of DirectMessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{ConversationSummary, DirectMessage, DirectMessageRepository, RepoResult};

use crate::models::{ConversationSummaryModel, MessageModel};

use super::error::map_db_error;

const MESSAGE_COLUMNS: &str =
    "message_id, sender_id, recipient_id, content, message_type, created_at, delivered_at, read_at";

/// PostgreSQL implementation of DirectMessageRepository
#[derive(Clone)]
pub struct PgDirectMessageRepository {
    pool: PgPool,
}

impl PgDirectMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectMessageRepository for PgDirectMessageRepository {
    #[instrument(skip(self, message), fields(message_id = %message.message_id))]
    async fn insert(&self, message: &DirectMessage) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO messages (message_id, sender_id, recipient_id, content, message_type, created_at, delivered_at, read_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(message.message_id)
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(&message.content)
        .bind(&message.message_type)
        .bind(message.created_at)
        .bind(message.delivered_at)
        .bind(message.read_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<DirectMessage>> {
        let result = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(DirectMessage::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<DirectMessage>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(DirectMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn conversation(
        &self,
        user_id: Uuid,
        peer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<DirectMessage>> {
        let rows = sqlx::query_as::<_, MessageModel>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(user_id)
        .bind(peer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(DirectMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn conversation_count(&self, user_id: Uuid, peer_id: Uuid) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ",
        )
        .bind(user_id)
        .bind(peer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn conversations_summary(&self, user_id: Uuid) -> RepoResult<Vec<ConversationSummary>> {
        let rows = sqlx::query_as::<_, ConversationSummaryModel>(
            r"
            WITH conversation_partners AS (
                SELECT DISTINCT
                    CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END AS partner_id
                FROM messages
                WHERE sender_id = $1 OR recipient_id = $1
            ),
            last_messages AS (
                SELECT DISTINCT ON (cp.partner_id)
                    cp.partner_id,
                    m.content,
                    m.created_at,
                    m.sender_id
                FROM conversation_partners cp
                JOIN messages m ON (
                    (m.sender_id = $1 AND m.recipient_id = cp.partner_id)
                    OR (m.sender_id = cp.partner_id AND m.recipient_id = $1)
                )
                ORDER BY cp.partner_id, m.created_at DESC
            ),
            unread_counts AS (
                SELECT sender_id AS partner_id, COUNT(*) AS unread_count
                FROM messages
                WHERE recipient_id = $1 AND read_at IS NULL
                GROUP BY sender_id
            )
            SELECT
                lm.partner_id AS peer_id,
                u.username AS peer_username,
                COALESCE(NULLIF(TRIM(u.display_name), ''), u.username) AS peer_display_name,
                lm.content AS last_message,
                lm.created_at AS last_message_at,
                lm.sender_id AS last_message_sender_id,
                COALESCE(uc.unread_count, 0) AS unread_count
            FROM last_messages lm
            JOIN users u ON lm.partner_id = u.id
            LEFT JOIN unread_counts uc ON lm.partner_id = uc.partner_id
            ORDER BY lm.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(ConversationSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn unread_for(&self, user_id: Uuid) -> RepoResult<Vec<DirectMessage>> {
        let rows = sqlx::query_as::<_, MessageModel>(&format!(
            r"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE recipient_id = $1 AND read_at IS NULL
            ORDER BY created_at DESC
            "
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(DirectMessage::from).collect())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn mark_delivered(&self, ids: &[Uuid]) -> RepoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r"
            UPDATE messages SET delivered_at = NOW()
            WHERE message_id = ANY($1) AND delivered_at IS NULL
            ",
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        message_id: Uuid,
        recipient_id: Uuid,
    ) -> RepoResult<Option<DateTime<Utc>>> {
        // Guarded update: only the recipient can read, and only once.
        // No row returned means either wrong caller or already read.
        let read_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r"
            UPDATE messages SET read_at = NOW()
            WHERE message_id = $1 AND recipient_id = $2 AND read_at IS NULL
            RETURNING read_at
            ",
        )
        .bind(message_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(read_at)
    }

    #[instrument(skip(self))]
    async fn sender_of(&self, message_id: Uuid) -> RepoResult<Option<Uuid>> {
        let sender = sqlx::query_scalar::<_, Uuid>(
            "SELECT sender_id FROM messages WHERE message_id = $1",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(sender)
    }
}
