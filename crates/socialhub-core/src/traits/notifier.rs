//! Outbound notification boundary.

use async_trait::async_trait;

use crate::result::AppResult;

/// Delivers templated messages (invitation emails) to a recipient.
///
/// Implementations return the delivery service's status code. Any error,
/// or a non-2xx status, is treated as a failed attempt by callers.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Send `template_id` to `email`, addressed to `display_name`.
    ///
    /// `sandbox` asks the delivery service to accept the message without
    /// delivering it.
    async fn send(
        &self,
        template_id: &str,
        display_name: &str,
        email: &str,
        vars: &serde_json::Value,
        sandbox: bool,
    ) -> AppResult<u16>;
}
