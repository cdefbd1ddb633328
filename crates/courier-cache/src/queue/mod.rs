//! Per-user offline message queues

mod offline_queue;

pub use offline_queue::{OfflineEntry, OfflineKind, OfflineQueueStore};
