//! Unified application error types for SocialHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Storage-level conditions that callers
//! must react to (uniqueness, absence) are translated into dedicated kinds at
//! the directory boundary so raw database text never leaks upward.

use std::fmt;
use thiserror::Error;

/// Why a bearer token was rejected.
///
/// Callers usually collapse every fault into "unauthenticated", but the
/// distinction is kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TokenFault {
    /// The token is not a structurally valid signed token.
    Malformed,
    /// The signature does not match the service secret.
    Signature,
    /// The token was signed with an algorithm other than the one we issue.
    Algorithm,
    /// The token is at or past its expiry.
    Expired,
    /// The token's not-before time has not been reached.
    NotYetValid,
    /// Issuer or audience do not match this service.
    Claims,
}

impl fmt::Display for TokenFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "MALFORMED"),
            Self::Signature => write!(f, "SIGNATURE"),
            Self::Algorithm => write!(f, "ALGORITHM"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::NotYetValid => write!(f, "NOT_YET_VALID"),
            Self::Claims => write!(f, "CLAIMS"),
        }
    }
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found (or is not visible to the caller).
    NotFound,
    /// Another user already registered this email address.
    DuplicateEmail,
    /// Another user already registered this username.
    DuplicateUsername,
    /// A generic uniqueness conflict (duplicate edge, duplicate hash, ...).
    Conflict,
    /// A bearer token failed validation.
    InvalidToken(TokenFault),
    /// The credential is missing or malformed.
    Unauthorized,
    /// The caller is authenticated but may not perform the action.
    Forbidden,
    /// A plaintext credential did not match the stored hash.
    CredentialMismatch,
    /// Input validation failed.
    Validation,
    /// The durable store failed or timed out.
    Storage,
    /// The cache backend failed or timed out.
    Cache,
    /// Password hashing failed.
    Hashing,
    /// Token signing is impossible (e.g. no secret configured).
    Signing,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An external collaborator (notifier) failed.
    ExternalService,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::DuplicateEmail => write!(f, "DUPLICATE_EMAIL"),
            Self::DuplicateUsername => write!(f, "DUPLICATE_USERNAME"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::InvalidToken(fault) => write!(f, "INVALID_TOKEN({fault})"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::CredentialMismatch => write!(f, "CREDENTIAL_MISMATCH"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Cache => write!(f, "CACHE"),
            Self::Hashing => write!(f, "HASHING"),
            Self::Signing => write!(f, "SIGNING"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ExternalService => write!(f, "EXTERNAL_SERVICE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout SocialHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a duplicate-email error.
    pub fn duplicate_email() -> Self {
        Self::new(ErrorKind::DuplicateEmail, "Email already exists")
    }

    /// Create a duplicate-username error.
    pub fn duplicate_username() -> Self {
        Self::new(ErrorKind::DuplicateUsername, "Username already exists")
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an invalid-token error carrying the rejection reason.
    pub fn invalid_token(fault: TokenFault, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidToken(fault), message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a credential-mismatch error.
    pub fn credential_mismatch() -> Self {
        Self::new(ErrorKind::CredentialMismatch, "Credential does not match")
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a cache error.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    /// Create a hashing error.
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Hashing, message)
    }

    /// Create a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an external-service error.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns the token fault if this is an invalid-token error.
    pub fn token_fault(&self) -> Option<TokenFault> {
        match self.kind {
            ErrorKind::InvalidToken(fault) => Some(fault),
            _ => None,
        }
    }

    /// Whether this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
