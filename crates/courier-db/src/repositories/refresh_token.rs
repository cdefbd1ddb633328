//! PostgreSQL implementation of RefreshTokenRepository
//!
//! Only SHA-256 digests are stored. Consumption is a single
//! compare-and-set UPDATE, which makes concurrent refresh of the same
//! token single-winner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use courier_core::{RefreshTokenRepository, RepoResult};

use super::error::map_db_error;

/// PostgreSQL implementation of RefreshTokenRepository
#[derive(Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    #[instrument(skip(self, token_hash))]
    async fn insert(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO refresh_tokens (token_id, user_id, token_hash, expires_at, created_at, revoked)
            VALUES ($1, $2, $3, $4, NOW(), false)
            ",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, token_hash))]
    async fn consume(&self, token_hash: &str) -> RepoResult<Option<Uuid>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r"
            UPDATE refresh_tokens SET revoked = true
            WHERE token_hash = $1 AND revoked = false AND expires_at > NOW()
            RETURNING user_id
            ",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(user_id)
    }

    #[instrument(skip(self, token_hash))]
    async fn revoke(&self, token_hash: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens SET revoked = true
            WHERE token_hash = $1 AND revoked = false
            ",
        )
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn revoke_all_for_user(&self, user_id: Uuid) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE refresh_tokens SET revoked = true
            WHERE user_id = $1 AND revoked = false
            ",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
