//! Database migration command.

use socialhub_core::config::AppConfig;
use socialhub_core::error::AppError;
use socialhub_database::DatabasePool;

use crate::output;

/// Run all pending migrations
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;

    println!("Running database migrations...");
    socialhub_database::migration::run_migrations(db.pool()).await?;
    output::print_success("All migrations applied successfully.");

    db.close().await;
    Ok(())
}
