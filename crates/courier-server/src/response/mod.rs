//! Response envelope and error handling for the REST surface
//!
//! Every response carries `{success, data?, error?, timestamp}`;
//! paginated list endpoints add a `pagination` block. Errors map the
//! typed taxonomy onto HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use courier_common::{AppError, ErrorBody};
use courier_core::DomainError;
use courier_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// The REST response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success envelope
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            pagination: None,
        }
    }

    /// Success envelope with pagination
    #[must_use]
    pub fn ok_paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            pagination: Some(pagination),
        }
    }
}

impl ApiResponse<()> {
    /// Failure envelope
    #[must_use]
    pub fn err(error: ErrorBody) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: Utc::now(),
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Pagination block for list endpoints
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// Derive the page block from limit/offset query values
    #[must_use]
    pub fn from_limit_offset(limit: i64, offset: i64, total_items: i64) -> Self {
        let page_size = limit.max(1);
        Self {
            page: offset / page_size + 1,
            page_size,
            total_items,
            total_pages: (total_items + page_size - 1) / page_size,
        }
    }
}

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error")]
    Validation(#[from] ValidationErrors),

    #[error("Missing authorization header")]
    MissingAuth,
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        let code = match self {
            Self::App(e) => e.status_code(),
            Self::Service(e) => e.status_code(),
            Self::Domain(e) => status_of_domain(e),
            Self::Validation(_) => 400,
            Self::MissingAuth => 401,
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the wire error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::MissingAuth => "AUTH_INVALID",
        }
    }
}

fn status_of_domain(e: &DomainError) -> u16 {
    if e.is_not_found() {
        404
    } else if e.is_authorization() {
        403
    } else if e.is_validation() {
        400
    } else if e.is_conflict() {
        409
    } else {
        500
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();
        let message = self.to_string();

        if status.is_server_error() {
            error!(error = ?self, "Server error");
        }

        // Per-field diagnostics for validation failures
        let details = if let Self::Validation(errors) = &self {
            serde_json::to_value(errors).ok()
        } else {
            None
        };

        let body = ApiResponse::err(ErrorBody {
            code,
            message,
            details,
        });

        (status, Json(body)).into_response()
    }
}

/// Type alias for REST handler results
pub type ApiResult<T> = Result<T, ApiError>;

/// Created response (201) wrapping an envelope
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_from_limit_offset() {
        let p = Pagination::from_limit_offset(50, 0, 120);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
        assert_eq!(p.total_items, 120);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::from_limit_offset(50, 100, 120);
        assert_eq!(p.page, 3);

        let p = Pagination::from_limit_offset(10, 0, 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn test_api_error_statuses() {
        assert_eq!(
            ApiError::MissingAuth.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::App(AppError::AuthInvalid).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Domain(DomainError::NotGroupMember).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_api_error_codes() {
        assert_eq!(ApiError::MissingAuth.error_code(), "AUTH_INVALID");
        assert_eq!(
            ApiError::Domain(DomainError::UsernameTaken).error_code(),
            "CONFLICT"
        );
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = ApiResponse::ok(42);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
        assert!(json.get("pagination").is_none());
        assert!(json.get("timestamp").is_some());
    }
}
