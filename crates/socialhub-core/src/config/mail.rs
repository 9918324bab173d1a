//! Invitation mail configuration.

use serde::{Deserialize, Serialize};

/// Settings for the invitation notifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address passed to the delivery service.
    #[serde(default)]
    pub from_email: String,
    /// Base URL of the frontend; activation links point at `{frontend_url}/confirm/{token}`.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    /// HTTP endpoint of the delivery service.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer key for the delivery service.
    #[serde(default)]
    pub api_key: String,
    /// Delivery attempts before the send is treated as failed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for each further attempt.
    #[serde(default = "default_backoff_base")]
    pub backoff_base_ms: u64,
    /// Timeout for one delivery request, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_email: String::new(),
            frontend_url: default_frontend_url(),
            endpoint: String::new(),
            api_key: String::new(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_frontend_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    10
}
