//! Outbound email boundary
//!
//! Reset emails are delivered by an external collaborator; the service
//! layer only depends on this trait. The in-tree implementation logs
//! the reset link, which is also what deployments without SMTP
//! credentials get.

use async_trait::async_trait;
use courier_common::AppResult;

/// Outbound mail delivery
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a password reset link to an address
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> AppResult<()>;
}

/// Mailer that only logs. Used when SMTP is not configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(&self, to: &str, reset_url: &str) -> AppResult<()> {
        tracing::info!(to = %to, reset_url = %reset_url, "Password reset requested (mail not configured)");
        Ok(())
    }
}
