//! JWT token validation.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use socialhub_core::error::{AppError, TokenFault};

use super::claims::Claims;

/// Validates HS256 bearer tokens.
///
/// Signature, algorithm, issuer and audience are checked by `jsonwebtoken`;
/// time bounds are checked here against an explicit clock so that a token
/// is rejected exactly at its expiry.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification. `None` when no secret is configured.
    decoding_key: Option<DecodingKey>,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("has_secret", &self.decoding_key.is_some())
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder accepting tokens from `issuer` for `audience`.
    ///
    /// An empty secret yields a decoder that rejects every token; an empty
    /// HMAC key is publicly known and would verify forged signatures.
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["sub", "iss", "aud", "iat", "nbf", "exp"]);

        Self {
            decoding_key: (!secret.is_empty()).then(|| DecodingKey::from_secret(secret.as_bytes())),
            validation,
        }
    }

    /// Decodes and validates a token at `now` (seconds since epoch).
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, AppError> {
        let key = self.decoding_key.as_ref().ok_or_else(|| {
            AppError::invalid_token(TokenFault::Signature, "No token secret configured")
        })?;

        let claims = decode::<Claims>(token, key, &self.validation)
            .map_err(map_jwt_error)?
            .claims;

        claims.check_time(now)?;
        Ok(claims)
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AppError {
    let fault = match e.kind() {
        JwtErrorKind::InvalidSignature => TokenFault::Signature,
        JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
            TokenFault::Algorithm
        }
        JwtErrorKind::ExpiredSignature => TokenFault::Expired,
        JwtErrorKind::ImmatureSignature => TokenFault::NotYetValid,
        JwtErrorKind::InvalidIssuer
        | JwtErrorKind::InvalidAudience
        | JwtErrorKind::InvalidSubject
        | JwtErrorKind::MissingRequiredClaim(_) => TokenFault::Claims,
        _ => TokenFault::Malformed,
    };
    AppError::invalid_token(fault, format!("Token validation failed: {e}"))
}
