//! Schema migrations for roles, users and invitations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use socialhub_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration. Already-applied versions are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let latest = MIGRATOR.iter().map(|m| m.version).max().unwrap_or_default();
    info!(
        known = MIGRATOR.iter().count(),
        latest_version = latest,
        "Applying schema migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Storage, format!("Schema migration failed: {e}"), e)
    })?;

    info!(latest_version = latest, "Schema is up to date");
    Ok(())
}
