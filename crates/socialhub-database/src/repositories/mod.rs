//! PostgreSQL implementations of the directory traits.

pub mod invitation;
pub mod role;
pub mod user;

pub use role::RoleRepository;
pub use user::UserRepository;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;

/// Run a directory call under the configured query timeout.
///
/// A timeout surfaces as a `Storage` error; the in-flight transaction (if
/// any) is dropped and therefore rolled back.
pub(crate) async fn bounded<T, F>(timeout: Duration, operation: &str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_ms = timeout.as_millis() as u64, "Directory call timed out");
            Err(AppError::storage(format!(
                "{operation} timed out after {}ms",
                timeout.as_millis()
            )))
        }
    }
}

/// Translate a unique-constraint name into the error callers react to.
///
/// Returns `None` for constraints that carry no domain meaning.
pub(crate) fn classify_constraint(constraint: Option<&str>) -> Option<AppError> {
    match constraint? {
        "users_email_key" => Some(AppError::duplicate_email()),
        "users_username_key" => Some(AppError::duplicate_username()),
        "user_invitations_pkey" => Some(AppError::conflict("Invitation already exists")),
        _ => None,
    }
}

/// Map an insert failure, translating known uniqueness violations.
pub(crate) fn map_insert_error(e: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if let Some(mapped) = classify_constraint(db_err.constraint()) {
            return mapped;
        }
    }
    AppError::with_source(
        socialhub_core::error::ErrorKind::Storage,
        message.to_string(),
        e,
    )
}
