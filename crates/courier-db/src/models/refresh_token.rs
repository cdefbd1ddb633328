//! Refresh token table model

use chrono::{DateTime, Utc};
use courier_core::RefreshToken;
use sqlx::FromRow;
use uuid::Uuid;

/// Row model for the `refresh_tokens` table
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenModel {
    pub token_id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

impl From<RefreshTokenModel> for RefreshToken {
    fn from(model: RefreshTokenModel) -> Self {
        Self {
            token_id: model.token_id,
            user_id: model.user_id,
            token_hash: model.token_hash,
            expires_at: model.expires_at,
            created_at: model.created_at,
            revoked: model.revoked,
        }
    }
}
