//! Individual WebSocket connection handle
//!
//! The handle owned by the registry and the router: the bounded
//! outbound sender, the authenticated identity, the token deadline, and
//! a one-shot close signal observed by the socket tasks.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use super::protocol::{CloseCode, ServerFrame};

/// A single authenticated WebSocket connection
pub struct Connection {
    /// Unique connection id
    id: Uuid,
    /// Authenticated user (fixed at handshake; the upgrade is refused
    /// without a valid token)
    user_id: Uuid,
    username: String,
    /// Access token expiry (Unix timestamp), re-checked on every frame
    token_expires_at: i64,
    /// Bounded channel draining into the writer task
    sender: mpsc::Sender<ServerFrame>,
    /// Set once; the first close reason wins
    close_tx: watch::Sender<Option<CloseCode>>,
    connected_at: Instant,
}

impl Connection {
    /// Create a new connection handle
    pub fn new(
        user_id: Uuid,
        username: String,
        token_expires_at: i64,
        sender: mpsc::Sender<ServerFrame>,
    ) -> Arc<Self> {
        let (close_tx, _) = watch::channel(None);
        Arc::new(Self {
            id: Uuid::new_v4(),
            user_id,
            username,
            token_expires_at,
            sender,
            close_tx,
            connected_at: Instant::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the access token presented at handshake has expired
    #[must_use]
    pub fn token_expired(&self) -> bool {
        Utc::now().timestamp() > self.token_expires_at
    }

    /// Connection age
    pub fn age(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }

    /// Queue a frame, waiting for channel capacity.
    ///
    /// Used only from the connection's own socket task (replay, acks),
    /// where waiting cannot stall another user's fan-out.
    pub async fn send(
        &self,
        frame: ServerFrame,
    ) -> Result<(), mpsc::error::SendError<ServerFrame>> {
        self.sender.send(frame).await
    }

    /// Queue a frame without waiting. The router always uses this: a
    /// full channel means a slow client, which is closed rather than
    /// allowed to apply backpressure to other connections.
    pub fn try_send(
        &self,
        frame: ServerFrame,
    ) -> Result<(), mpsc::error::TrySendError<ServerFrame>> {
        self.sender.try_send(frame)
    }

    /// Request the socket tasks to close with the given code. The first
    /// request wins; later requests are ignored.
    pub fn request_close(&self, code: CloseCode) {
        self.close_tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(code);
                true
            } else {
                false
            }
        });
    }

    /// Whether a close has been requested
    #[must_use]
    pub fn close_requested(&self) -> bool {
        self.close_tx.borrow().is_some()
    }

    /// Subscribe to the close signal
    pub fn subscribe_close(&self) -> watch::Receiver<Option<CloseCode>> {
        self.close_tx.subscribe()
    }

    /// Whether the outbound channel is closed (writer task gone)
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
