//! Conversation history endpoints

use axum::extract::{Path, State};
use courier_service::{ConversationSummaryResponse, MessageResponse, MessageService};
use uuid::Uuid;

use crate::extractors::{AuthUser, PageQuery};
use crate::response::{ApiResponse, ApiResult, Pagination};
use crate::state::AppState;

/// `GET /api/v1/conversations` — one row per peer with preview and
/// unread count
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<ConversationSummaryResponse>>> {
    let service = MessageService::new(state.services());
    let conversations = service.conversations(auth.user_id).await?;
    Ok(ApiResponse::ok(conversations))
}

/// `GET /api/v1/conversation/{peer_id}?limit&offset` — newest first
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(peer_id): Path<Uuid>,
    page: PageQuery,
) -> ApiResult<ApiResponse<Vec<MessageResponse>>> {
    let service = MessageService::new(state.services());
    let (messages, total) = service
        .conversation(auth.user_id, peer_id, page.limit, page.offset)
        .await?;

    Ok(ApiResponse::ok_paginated(
        messages,
        Pagination::from_limit_offset(page.limit, page.offset, total),
    ))
}
