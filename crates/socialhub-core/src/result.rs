//! Convenience result type alias for SocialHub.

use crate::error::AppError;

/// A specialized `Result` type for SocialHub operations.
pub type AppResult<T> = Result<T, AppError>;
