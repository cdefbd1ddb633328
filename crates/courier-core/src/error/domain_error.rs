//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // Not found
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    // Validation
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Cannot send a message to yourself")]
    SelfMessage,

    // Conflicts
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    // Authorization
    #[error("Not a member of this group")]
    NotGroupMember,

    #[error("Group admin role required")]
    NotGroupAdmin,

    // Infrastructure (wrapped)
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl DomainError {
    /// Get an error code string for API responses and error frames
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) | Self::MessageNotFound(_) | Self::GroupNotFound(_) => {
                "NOT_FOUND"
            }
            Self::Validation(_) | Self::SelfMessage => "VALIDATION_ERROR",
            Self::ContentTooLong { .. } => "VALIDATION_ERROR",
            Self::UsernameTaken | Self::EmailTaken => "CONFLICT",
            Self::NotGroupMember => "NOT_GROUP_MEMBER",
            Self::NotGroupAdmin => "FORBIDDEN",
            Self::Database(_) | Self::Cache(_) => "PERSIST_FAILED",
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::MessageNotFound(_) | Self::GroupNotFound(_)
        )
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::ContentTooLong { .. } | Self::SelfMessage
        )
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken | Self::EmailTaken)
    }

    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotGroupMember | Self::NotGroupAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::UserNotFound(Uuid::nil()).code(), "NOT_FOUND");
        assert_eq!(DomainError::UsernameTaken.code(), "CONFLICT");
        assert_eq!(DomainError::NotGroupMember.code(), "NOT_GROUP_MEMBER");
        assert_eq!(DomainError::NotGroupAdmin.code(), "FORBIDDEN");
        assert_eq!(
            DomainError::Database("down".to_string()).code(),
            "PERSIST_FAILED"
        );
        assert_eq!(
            DomainError::ContentTooLong { max: 10_000 }.code(),
            "VALIDATION_ERROR"
        );
    }

    #[test]
    fn test_classification() {
        assert!(DomainError::GroupNotFound(Uuid::nil()).is_not_found());
        assert!(DomainError::SelfMessage.is_validation());
        assert!(DomainError::EmailTaken.is_conflict());
        assert!(DomainError::NotGroupMember.is_authorization());
        assert!(!DomainError::Cache("x".to_string()).is_validation());
    }
}
