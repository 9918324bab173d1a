//! Token issuance and validation facade.

use chrono::{DateTime, Duration, Utc};

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;
use socialhub_entity::token::AccessToken;

use super::claims::Claims;
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Ten years. Longer lifetimes are clamped.
const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Issues and validates signed bearer tokens for this service.
///
/// There is no revocation list: a token is valid until its expiry.
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenAuthenticator {
    /// Creates an authenticator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let audience = config.audience().to_string();
        Self {
            encoder: JwtEncoder::new(&config.token_secret),
            decoder: JwtDecoder::new(&config.token_secret, &config.token_issuer, &audience),
            issuer: config.token_issuer.clone(),
            audience,
            ttl: Duration::hours(config.token_ttl_hours.min(MAX_TTL_HOURS) as i64),
        }
    }

    /// Signs arbitrary claims.
    pub fn generate_token(&self, claims: &Claims) -> Result<String, AppError> {
        self.encoder.encode(claims)
    }

    /// Issues a token for `user_id` valid from now for the configured TTL.
    pub fn issue_for(&self, user_id: i64) -> Result<AccessToken, AppError> {
        self.issue_for_at(user_id, Utc::now())
    }

    /// Issues a token for `user_id` as of `now`.
    pub fn issue_for_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<AccessToken, AppError> {
        let claims = Claims::new(user_id, &self.issuer, &self.audience, self.ttl, now);
        let token = self.generate_token(&claims)?;
        Ok(AccessToken {
            token,
            expires_in: self.ttl.num_seconds().max(0) as u64,
        })
    }

    /// Validates a token against the current time.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        self.validate_token_at(token, Utc::now().timestamp())
    }

    /// Validates a token against `now` (seconds since epoch).
    pub fn validate_token_at(&self, token: &str, now: i64) -> Result<Claims, AppError> {
        self.decoder.decode_at(token, now)
    }
}
