//! Handler error type

use courier_common::AppError;
use courier_core::DomainError;
use courier_service::ServiceError;

use crate::gateway::protocol::CloseCode;

/// Outcome of a failed frame handler
#[derive(Debug)]
pub enum HandlerError {
    /// Reply with an error frame; the connection stays open
    Frame { code: String, message: String },

    /// Close the connection with the given code
    Close(CloseCode),
}

/// Result type for frame handlers
pub type HandlerResult<T> = Result<T, HandlerError>;

impl HandlerError {
    /// Build an error-frame outcome
    pub fn frame(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Frame {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<DomainError> for HandlerError {
    fn from(err: DomainError) -> Self {
        Self::Frame {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<AppError> for HandlerError {
    fn from(err: AppError) -> Self {
        Self::Frame {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        Self::Frame {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_domain_error_becomes_frame() {
        let err = HandlerError::from(DomainError::NotGroupMember);
        match err {
            HandlerError::Frame { code, .. } => assert_eq!(code, "NOT_GROUP_MEMBER"),
            HandlerError::Close(_) => panic!("expected frame"),
        }
    }

    #[test]
    fn test_not_found_becomes_frame() {
        let err = HandlerError::from(DomainError::UserNotFound(Uuid::nil()));
        match err {
            HandlerError::Frame { code, .. } => assert_eq!(code, "NOT_FOUND"),
            HandlerError::Close(_) => panic!("expected frame"),
        }
    }
}
