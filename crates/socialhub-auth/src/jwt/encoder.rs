//! JWT token signing.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use socialhub_core::error::AppError;

use super::claims::Claims;

/// Signs claims into HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing. `None` when no secret is configured.
    encoding_key: Option<EncodingKey>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("has_secret", &self.encoding_key.is_some())
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder. An empty secret yields an encoder that refuses
    /// to sign.
    pub fn new(secret: &str) -> Self {
        let encoding_key = if secret.is_empty() {
            None
        } else {
            Some(EncodingKey::from_secret(secret.as_bytes()))
        };
        Self { encoding_key }
    }

    /// Signs the given claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| AppError::signing("No token secret configured"))?;

        encode(&Header::new(Algorithm::HS256), claims, key)
            .map_err(|e| AppError::signing(format!("Failed to sign token: {e}")))
    }
}
