//! User table model

use chrono::{DateTime, Utc};
use courier_core::{User, UserRole};
use sqlx::FromRow;
use uuid::Uuid;

/// Row model for the `users` table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            display_name: model.display_name,
            // role column is CHECK-constrained; unknown values fall back
            role: model.role.parse().unwrap_or(UserRole::User),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
