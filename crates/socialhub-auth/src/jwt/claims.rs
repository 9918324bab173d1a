//! JWT claims structure carried by every bearer token.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use socialhub_core::error::{AppError, TokenFault};

/// Registered claims embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID, as a decimal string.
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id`, valid from `now` for `ttl`.
    pub fn new(
        user_id: i64,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            sub: user_id.to_string(),
            iss: issuer.into(),
            aud: audience.into(),
            iat,
            nbf: iat,
            exp: (now + ttl).timestamp(),
        }
    }

    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub.parse().map_err(|_| {
            AppError::invalid_token(TokenFault::Claims, "Token subject is not a user id")
        })
    }

    /// Checks the time bounds at `now` (seconds since epoch).
    ///
    /// A token is valid on `[nbf, exp)`.
    pub fn check_time(&self, now: i64) -> Result<(), AppError> {
        if now >= self.exp {
            return Err(AppError::invalid_token(TokenFault::Expired, "Token has expired"));
        }
        if now < self.nbf {
            return Err(AppError::invalid_token(
                TokenFault::NotYetValid,
                "Token is not valid yet",
            ));
        }
        Ok(())
    }
}
