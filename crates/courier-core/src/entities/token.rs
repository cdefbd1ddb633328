//! Stored refresh token

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A refresh token row. Only the SHA-256 of the opaque token is stored;
/// the plaintext never touches the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token_id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked: bool,
}

impl RefreshToken {
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// A token is usable only while unrevoked and unexpired
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.revoked && !self.is_expired()
    }
}
