//! Integration test support
//!
//! These tests run against live PostgreSQL and Redis instances and are
//! skipped when `DATABASE_URL` / `REDIS_URL` are not set.

pub mod fixtures;
pub mod helpers;

pub use helpers::{check_test_env, TestServer, WsClient};
