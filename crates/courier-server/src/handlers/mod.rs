//! REST request handlers

pub mod auth;
pub mod conversations;
pub mod groups;
pub mod health;
pub mod messages;
pub mod users;
