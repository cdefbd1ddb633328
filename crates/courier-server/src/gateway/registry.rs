//! Connection registry
//!
//! In-process map from user id to that user's live sockets, in
//! registration order. This is the authoritative source for "who can
//! receive a frame right now on this node"; the presence keys in the
//! cache are the derived TTL-bounded view.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::connection::Connection;
use super::protocol::{CloseCode, ServerFrame};

/// Connection registry with a per-user socket cap
pub struct ConnectionRegistry {
    /// user id → registration-ordered live sockets
    connections: DashMap<Uuid, Vec<Arc<Connection>>>,
    max_per_user: usize,
}

impl ConnectionRegistry {
    /// Create a registry enforcing the given per-user cap
    #[must_use]
    pub fn new(max_per_user: usize) -> Self {
        Self {
            connections: DashMap::new(),
            max_per_user: max_per_user.max(1),
        }
    }

    /// Register a connection. When the user is at the cap, the oldest
    /// sockets are evicted (asked to close with 1013) inside the same
    /// entry lock that admits the new one, so the cap is never observed
    /// exceeded. Returns the evicted connections.
    pub fn register(&self, conn: Arc<Connection>) -> Vec<Arc<Connection>> {
        let mut evicted = Vec::new();

        let mut entry = self.connections.entry(conn.user_id()).or_default();
        while entry.len() >= self.max_per_user {
            let oldest = entry.remove(0);
            oldest.request_close(CloseCode::Overloaded);
            evicted.push(oldest);
        }
        entry.push(conn.clone());
        drop(entry);

        if !evicted.is_empty() {
            tracing::info!(
                user_id = %conn.user_id(),
                evicted = evicted.len(),
                "Connection cap reached, evicted oldest"
            );
        }
        tracing::debug!(
            user_id = %conn.user_id(),
            connection_id = %conn.id(),
            "Connection registered"
        );

        evicted
    }

    /// Remove a connection. Returns true when this was the user's last
    /// socket (the caller then clears the presence key).
    pub fn unregister(&self, conn: &Connection) -> bool {
        let mut last = false;

        if let Entry::Occupied(mut entry) = self.connections.entry(conn.user_id()) {
            entry.get_mut().retain(|c| c.id() != conn.id());
            if entry.get().is_empty() {
                entry.remove();
                last = true;
            }
        }

        tracing::debug!(
            user_id = %conn.user_id(),
            connection_id = %conn.id(),
            last,
            "Connection unregistered"
        );

        last
    }

    /// Snapshot of a user's live sockets, safe to iterate while other
    /// tasks register and unregister
    pub fn sockets_for(&self, user_id: Uuid) -> Vec<Arc<Connection>> {
        self.connections
            .get(&user_id)
            .map(|sockets| sockets.clone())
            .unwrap_or_default()
    }

    /// Cheap membership test
    pub fn is_locally_online(&self, user_id: Uuid) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|sockets| !sockets.is_empty())
    }

    /// Fan a frame out to every live socket of a user.
    ///
    /// A full outbound channel marks that socket for closure (slow
    /// client policy) without affecting the others. Returns the number
    /// of sockets the frame was queued to.
    pub fn send_to_user(&self, user_id: Uuid, frame: &ServerFrame) -> usize {
        let mut sent = 0;

        for conn in self.sockets_for(user_id) {
            match conn.try_send(frame.clone()) {
                Ok(()) => sent += 1,
                Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        user_id = %user_id,
                        connection_id = %conn.id(),
                        "Outbound channel full, closing slow connection"
                    );
                    conn.request_close(CloseCode::Overloaded);
                }
                Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {}
            }
        }

        sent
    }

    /// Number of users with at least one live socket
    pub fn user_count(&self) -> usize {
        self.connections.len()
    }

    /// Total number of live sockets
    pub fn connection_count(&self) -> usize {
        self.connections.iter().map(|entry| entry.len()).sum()
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("users", &self.connections.len())
            .field("max_per_user", &self.max_per_user)
            .finish()
    }
}
