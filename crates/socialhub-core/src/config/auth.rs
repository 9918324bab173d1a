//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token, credential and invitation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256). Empty disables issuance.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,
    /// Issuer embedded in (and required of) every token.
    #[serde(default = "default_token_issuer")]
    pub token_issuer: String,
    /// Audience claim; falls back to the issuer when unset.
    #[serde(default)]
    pub token_audience: Option<String>,
    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Lifetime of an activation invitation in hours.
    #[serde(default = "default_invitation_ttl")]
    pub invitation_ttl_hours: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Maximum password length.
    #[serde(default = "default_password_max")]
    pub password_max_length: usize,
    /// Minimum zxcvbn score (0-4). 0 disables the strength check.
    #[serde(default)]
    pub password_min_score: u8,
}

impl AuthConfig {
    /// The audience tokens are issued for.
    pub fn audience(&self) -> &str {
        self.token_audience
            .as_deref()
            .unwrap_or(self.token_issuer.as_str())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: default_token_secret(),
            token_issuer: default_token_issuer(),
            token_audience: None,
            token_ttl_hours: default_token_ttl(),
            invitation_ttl_hours: default_invitation_ttl(),
            password_min_length: default_password_min(),
            password_max_length: default_password_max(),
            password_min_score: 0,
        }
    }
}

fn default_token_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_issuer() -> String {
    "socialhub".to_string()
}

fn default_token_ttl() -> u64 {
    72
}

fn default_invitation_ttl() -> u64 {
    72
}

fn default_password_min() -> usize {
    3
}

fn default_password_max() -> usize {
    72
}
