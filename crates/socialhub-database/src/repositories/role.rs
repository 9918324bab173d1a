//! Role repository implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgExecutor;

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_entity::user::Role;

use super::bounded;
use crate::directory::RoleStore;

/// Repository for role reference data.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl RoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn get_by_name(&self, name: &str) -> AppResult<Role> {
        bounded(self.query_timeout, "role.get_by_name", async {
            fetch_by_name(&self.pool, name)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Role '{name}' not found")))
        })
        .await
    }
}

/// Look up a role by name on any executor (pool or open transaction).
pub(crate) async fn fetch_by_name<'c, E>(executor: E, name: &str) -> AppResult<Option<Role>>
where
    E: PgExecutor<'c>,
{
    sqlx::query_as::<_, Role>("SELECT id, name, level, description FROM roles WHERE name = $1")
        .bind(name)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find role by name", e))
}
