//! Bounded retries with exponential backoff around any notifier.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use socialhub_core::config::MailConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::traits::Notifier;

use super::is_success;

/// Retries a failing delivery up to `max_attempts` times.
///
/// The delay before attempt `n` (1-based, `n > 1`) is
/// `backoff_base * 2^(n - 2)`. Errors and non-2xx statuses are both
/// retried; the last failure is returned once attempts are exhausted.
#[derive(Debug, Clone)]
pub struct RetryingNotifier {
    inner: Arc<dyn Notifier>,
    max_attempts: u32,
    backoff_base: Duration,
}

impl RetryingNotifier {
    /// Wrap `inner` with explicit retry settings.
    pub fn new(inner: Arc<dyn Notifier>, max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            backoff_base,
        }
    }

    /// Wrap `inner` with the retry settings from mail configuration.
    pub fn from_config(inner: Arc<dyn Notifier>, config: &MailConfig) -> Self {
        Self::new(
            inner,
            config.max_attempts,
            Duration::from_millis(config.backoff_base_ms),
        )
    }

    /// Delay to wait before the given 1-based attempt.
    fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = (attempt - 2).min(16);
        self.backoff_base.saturating_mul(1u32 << exponent)
    }
}

#[async_trait]
impl Notifier for RetryingNotifier {
    async fn send(
        &self,
        template_id: &str,
        display_name: &str,
        email: &str,
        vars: &serde_json::Value,
        sandbox: bool,
    ) -> AppResult<u16> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let delay = self.delay_before(attempt);
                info!(
                    attempt = attempt,
                    max = self.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying invitation delivery"
                );
                tokio::time::sleep(delay).await;
            }

            match self
                .inner
                .send(template_id, display_name, email, vars, sandbox)
                .await
            {
                Ok(status) if is_success(status) => return Ok(status),
                Ok(status) => {
                    warn!(attempt = attempt, status, "Invitation delivery rejected");
                    last_error = Some(AppError::external_service(format!(
                        "Notifier responded with status {status}"
                    )));
                }
                Err(e) => {
                    warn!(attempt = attempt, error = %e, "Invitation delivery failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::external_service("Invitation was not sent")))
    }
}
