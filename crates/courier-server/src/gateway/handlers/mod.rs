//! Frame handlers
//!
//! One dispatcher per socket: every inbound text frame is parsed into
//! the closed frame sum and routed to its handler. Validation failures
//! answer with an error frame and keep the connection open; only
//! authentication expiry closes it.

mod direct;
mod error;
mod group;
mod heartbeat;
mod read_receipt;
mod typing;

pub use error::{HandlerError, HandlerResult};
pub use typing::TypingLimiter;

use std::sync::Arc;

use crate::gateway::connection::Connection;
use crate::gateway::protocol::{ClientFrame, CloseCode, FrameParseError, ServerFrame};
use crate::state::AppState;

/// Routes inbound frames to their handlers
pub struct FrameDispatcher;

impl FrameDispatcher {
    /// Handle one inbound text frame. Returns a close code when the
    /// connection must be terminated.
    pub async fn dispatch(
        state: &AppState,
        conn: &Arc<Connection>,
        text: &str,
    ) -> Option<CloseCode> {
        // Token expiry is detected on the next frame after it happens
        if conn.token_expired() {
            tracing::debug!(
                user_id = %conn.user_id(),
                "Access token expired, closing connection"
            );
            return Some(CloseCode::AuthFailed);
        }

        let frame = match ClientFrame::parse(text) {
            Ok(frame) => frame,
            Err(err) => {
                let (code, message) = match err {
                    FrameParseError::Json => ("PARSE_ERROR", err.to_string()),
                    FrameParseError::UnknownType(_) => ("INVALID_MESSAGE_TYPE", err.to_string()),
                    FrameParseError::MissingRecipient => ("MISSING_RECIPIENT", err.to_string()),
                    FrameParseError::MissingGroup => ("MISSING_GROUP", err.to_string()),
                    FrameParseError::Invalid(_) => ("VALIDATION_ERROR", err.to_string()),
                };
                let _ = conn.send(ServerFrame::error(code, message)).await;
                return None;
            }
        };

        let result = match frame {
            ClientFrame::MessageSend {
                recipient_id,
                content,
                message_type,
            } => direct::handle(state, conn, recipient_id, content, message_type).await,
            ClientFrame::GroupMessageSend {
                group_id,
                content,
                message_type,
            } => group::handle(state, conn, group_id, content, message_type).await,
            ClientFrame::MessageRead { message_id } => {
                read_receipt::handle(state, conn, message_id).await
            }
            ClientFrame::Typing {
                recipient_id,
                group_id,
            } => typing::handle(state, conn, recipient_id, group_id).await,
            ClientFrame::Ping => heartbeat::handle(state, conn).await,
        };

        match result {
            Ok(()) => None,
            Err(HandlerError::Frame { code, message }) => {
                let _ = conn.send(ServerFrame::error(code, message)).await;
                None
            }
            Err(HandlerError::Close(code)) => Some(code),
        }
    }
}
