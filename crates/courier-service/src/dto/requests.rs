//! Request DTOs with field validation

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Signup request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 100))]
    pub display_name: Option<String>,
}

/// Login request; `login` accepts a username or an email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255))]
    pub login: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Logout request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Password reset issuance request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RequestResetRequest {
    #[validate(email)]
    pub email: String,
}

/// Password reset redemption request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmResetRequest {
    #[validate(length(min = 1))]
    pub token: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Group creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Initial members besides the creator
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

/// Add members to a group
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMembersRequest {
    #[validate(length(min = 1))]
    pub member_ids: Vec<Uuid>,
}
