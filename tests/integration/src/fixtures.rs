//! Test fixtures and data generators

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Signup request body
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        let nonce = Uuid::new_v4().simple().to_string();
        Self {
            username: format!("user_{suffix}_{}", &nonce[..8]),
            email: format!("user{suffix}.{}@example.com", &nonce[..8]),
            password: "TestPass123".to_string(),
        }
    }
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_signup(signup: &SignupRequest) -> Self {
        Self {
            login: signup.username.clone(),
            password: signup.password.clone(),
        }
    }
}

/// User block inside auth responses
#[derive(Debug, Deserialize)]
pub struct UserData {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// Auth response data
#[derive(Debug, Deserialize)]
pub struct AuthData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
