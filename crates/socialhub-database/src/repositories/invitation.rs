//! Invitation rows. Only ever touched inside a user transaction.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;

use super::map_insert_error;

/// Insert an invitation for `user_id`.
pub(crate) async fn insert(
    conn: &mut PgConnection,
    token_hash: &str,
    user_id: i64,
    expiry: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query("INSERT INTO user_invitations (token_hash, user_id, expiry) VALUES ($1, $2, $3)")
        .bind(token_hash)
        .bind(user_id)
        .bind(expiry)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_insert_error(e, "Failed to create invitation"))?;
    Ok(())
}

/// Find the user a still-redeemable invitation belongs to, locking the row.
///
/// Expiry is judged against the database clock, the same clock that stamped
/// `created_at` when the invitation was written.
pub(crate) async fn find_redeemable_user(
    conn: &mut PgConnection,
    token_hash: &str,
) -> AppResult<Option<i64>> {
    sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM user_invitations \
         WHERE token_hash = $1 AND expiry > NOW() FOR UPDATE",
    )
    .bind(token_hash)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to look up invitation", e))
}

/// Delete every invitation belonging to `user_id`. Returns the number removed.
pub(crate) async fn delete_for_user(conn: &mut PgConnection, user_id: i64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM user_invitations WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to delete invitations", e))?;
    Ok(result.rows_affected())
}
