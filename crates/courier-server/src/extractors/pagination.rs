//! Pagination extractor
//!
//! Validates `limit`/`offset` query parameters: limit ∈ [1, 100]
//! (default 50), offset ≥ 0 (default 0).

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use courier_common::AppError;
use serde::Deserialize;

use crate::response::ApiError;

/// Default page size
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest accepted page size
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
struct RawPageQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Validated limit/offset pair
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub limit: i64,
    pub offset: i64,
}

#[async_trait]
impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawPageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::App(AppError::validation(e.to_string())))?;

        let limit = raw.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ApiError::App(AppError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            ))));
        }

        let offset = raw.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::App(AppError::validation(
                "offset must not be negative",
            )));
        }

        Ok(PageQuery { limit, offset })
    }
}
