//! Message state endpoints

use axum::extract::{Path, State};
use courier_service::{MessageResponse, MessageService, ReadReceipt};
use uuid::Uuid;

use crate::extractors::AuthUser;
use crate::gateway::protocol::ServerFrame;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// `POST /api/v1/messages/{message_id}/read` — REST twin of the
/// websocket read receipt, for clients that mark on load. Notifies the
/// sender's live sockets through the shared registry.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> ApiResult<ApiResponse<Option<ReadReceipt>>> {
    let service = MessageService::new(state.services());
    let receipt = service.mark_read(message_id, auth.user_id).await?;

    if let Some(receipt) = &receipt {
        state.registry().send_to_user(
            receipt.sender_id,
            &ServerFrame::MessageRead {
                message_id: receipt.message_id,
                reader_id: receipt.reader_id,
                read_at: receipt.read_at,
            },
        );
    }

    Ok(ApiResponse::ok(receipt))
}

/// `GET /api/v1/messages/unread` — unread direct messages, newest first
pub async fn unread(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<ApiResponse<Vec<MessageResponse>>> {
    let service = MessageService::new(state.services());
    let messages = service.unread(auth.user_id).await?;
    Ok(ApiResponse::ok(messages))
}
