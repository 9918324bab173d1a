//! HTTP delivery-service transport.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use socialhub_core::config::MailConfig;
use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_core::traits::Notifier;

/// Posts templated messages as JSON to a delivery service endpoint.
///
/// Performs a single attempt; wrap it in a
/// [`RetryingNotifier`](super::RetryingNotifier) for retries.
#[derive(Clone)]
pub struct HttpNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from_email: String,
}

impl std::fmt::Debug for HttpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNotifier")
            .field("endpoint", &self.endpoint)
            .field("from_email", &self.from_email)
            .finish_non_exhaustive()
    }
}

impl HttpNotifier {
    /// Build a notifier from mail configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        if config.endpoint.is_empty() {
            return Err(AppError::configuration("mail.endpoint is not set"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            from_email: config.from_email.clone(),
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(
        &self,
        template_id: &str,
        display_name: &str,
        email: &str,
        vars: &serde_json::Value,
        sandbox: bool,
    ) -> AppResult<u16> {
        let body = json!({
            "template_id": template_id,
            "from": self.from_email,
            "to": { "name": display_name, "email": email },
            "variables": vars,
            "sandbox": sandbox,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Delivery request failed: {e}"),
                    e,
                )
            })?;

        let status = response.status().as_u16();
        debug!(template_id, status, "Delivery service responded");
        Ok(status)
    }
}
