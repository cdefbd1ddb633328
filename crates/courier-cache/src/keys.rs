//! Redis key patterns and TTL defaults

use uuid::Uuid;

/// Prefix for presence keys
pub const ONLINE_PREFIX: &str = "user:online:";
/// Prefix for offline queue keys
pub const OFFLINE_QUEUE_PREFIX: &str = "user:offline:";
/// Prefix for hashed password-reset tokens
pub const RESET_TOKEN_PREFIX: &str = "reset:";

/// Presence TTL in seconds, refreshed by heartbeat
pub const DEFAULT_HEARTBEAT_TTL: u64 = 60;
/// Offline queue TTL in seconds (7 days)
pub const DEFAULT_OFFLINE_QUEUE_TTL: u64 = 604_800;
/// Reset token TTL in seconds (1 hour)
pub const DEFAULT_RESET_TOKEN_TTL: u64 = 3_600;

/// Key tracking a user's online status
#[must_use]
pub fn user_online(user_id: Uuid) -> String {
    format!("{ONLINE_PREFIX}{user_id}")
}

/// Key for a user's offline message queue
#[must_use]
pub fn offline_queue(user_id: Uuid) -> String {
    format!("{OFFLINE_QUEUE_PREFIX}{user_id}")
}

/// Work key used while draining an offline queue
#[must_use]
pub fn offline_queue_work(user_id: Uuid, drain_id: Uuid) -> String {
    format!("{OFFLINE_QUEUE_PREFIX}{user_id}:drain:{drain_id}")
}

/// Key for a hashed password-reset token
#[must_use]
pub fn reset_token(token_hash: &str) -> String {
    format!("{RESET_TOKEN_PREFIX}{token_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        let id = Uuid::nil();
        assert_eq!(
            user_online(id),
            "user:online:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            offline_queue(id),
            "user:offline:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(reset_token("abc"), "reset:abc");
        assert!(offline_queue_work(id, id).starts_with("user:offline:"));
    }
}
