//! Typing indicator handler
//!
//! Fire-and-forget: no persistence, no acks. At most one event per
//! second per (sender, target) pair; excess events are dropped
//! silently.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use courier_core::DomainError;

use crate::gateway::connection::Connection;
use crate::gateway::protocol::ServerFrame;
use crate::state::AppState;

use super::HandlerResult;

/// Minimum interval between typing events per (sender, target)
const TYPING_INTERVAL: Duration = Duration::from_secs(1);

/// A typing target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypingTarget {
    User(Uuid),
    Group(Uuid),
}

/// Per-(sender, target) rate limiter
#[derive(Debug, Default)]
pub struct TypingLimiter {
    last_event: DashMap<(Uuid, TypingTarget), Instant>,
}

impl TypingLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when this event may be forwarded, recording it
    pub fn allow(&self, sender: Uuid, target: TypingTarget) -> bool {
        let now = Instant::now();
        let mut allowed = false;

        self.last_event
            .entry((sender, target))
            .and_modify(|last| {
                if now.duration_since(*last) >= TYPING_INTERVAL {
                    *last = now;
                    allowed = true;
                }
            })
            .or_insert_with(|| {
                allowed = true;
                now
            });

        allowed
    }
}

pub async fn handle(
    state: &AppState,
    conn: &Arc<Connection>,
    recipient_id: Option<Uuid>,
    group_id: Option<Uuid>,
) -> HandlerResult<()> {
    let sender_id = conn.user_id();

    match (recipient_id, group_id) {
        (Some(recipient_id), None) => {
            if !state
                .typing_limiter()
                .allow(sender_id, TypingTarget::User(recipient_id))
            {
                return Ok(());
            }

            state.registry().send_to_user(
                recipient_id,
                &ServerFrame::Typing {
                    user_id: sender_id,
                    recipient_id: Some(recipient_id),
                    group_id: None,
                },
            );
            Ok(())
        }
        (None, Some(group_id)) => {
            if !state
                .typing_limiter()
                .allow(sender_id, TypingTarget::Group(group_id))
            {
                return Ok(());
            }

            // Fire-and-forget: a non-member's event is dropped without
            // an error frame
            if !state
                .services()
                .group_repo()
                .is_member(group_id, sender_id)
                .await?
            {
                return Ok(());
            }

            let frame = ServerFrame::Typing {
                user_id: sender_id,
                recipient_id: None,
                group_id: Some(group_id),
            };
            for member_id in state.services().group_repo().member_ids(group_id).await? {
                if member_id != sender_id {
                    state.registry().send_to_user(member_id, &frame);
                }
            }
            Ok(())
        }
        _ => Err(DomainError::Validation(
            "typing requires exactly one of recipient_id or group_id".to_string(),
        )
        .into()),
    }
}
