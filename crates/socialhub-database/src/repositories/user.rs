//! User repository implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{debug, info};

use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_entity::invitation::hash_token;
use socialhub_entity::user::{NewUser, Role, User};

use super::{bounded, invitation, map_insert_error, role};
use crate::directory::{UserDirectory, UserReader};

/// A `users` row joined with its role.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    role_id: i64,
    role_name: String,
    role_level: i64,
    role_description: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_active: row.is_active,
            role: Role::new(row.role_id, row.role_name, row.role_level, row.role_description),
            created_at: row.created_at,
        }
    }
}

/// Repository for user CRUD and the invitation workflow.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn begin(&self) -> AppResult<sqlx::Transaction<'static, sqlx::Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to begin transaction", e))
    }
}

#[async_trait]
impl UserReader for UserRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        bounded(self.query_timeout, "user.get_by_id", async {
            sqlx::query_as::<_, UserRow>(
                "SELECT u.id, u.username, u.email, u.password_hash, u.is_active, u.created_at, \
                        r.id AS role_id, r.name AS role_name, r.level AS role_level, \
                        r.description AS role_description \
                 FROM users u JOIN roles r ON r.id = u.role_id \
                 WHERE u.id = $1 AND u.is_active = TRUE",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to find user by id", e))?
            .map(User::from)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
        })
        .await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<User> {
        bounded(self.query_timeout, "user.get_by_email", async {
            sqlx::query_as::<_, UserRow>(
                "SELECT u.id, u.username, u.email, u.password_hash, u.is_active, u.created_at, \
                        r.id AS role_id, r.name AS role_name, r.level AS role_level, \
                        r.description AS role_description \
                 FROM users u JOIN roles r ON r.id = u.role_id \
                 WHERE u.email = $1 AND u.is_active = TRUE",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to find user by email", e)
            })?
            .map(User::from)
            .ok_or_else(|| AppError::not_found("User not found"))
        })
        .await
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        bounded(self.query_timeout, "user.create", async {
            let mut tx = self.begin().await?;
            let user = insert_user(&mut tx, new_user).await?;
            commit(tx).await?;
            Ok(user)
        })
        .await
    }

    async fn create_and_invite(
        &self,
        new_user: &NewUser,
        invitation_hash: &str,
        ttl: Duration,
    ) -> AppResult<User> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::validation(format!("Invalid invitation TTL: {e}")))?;

        bounded(self.query_timeout, "user.create_and_invite", async {
            let mut tx = self.begin().await?;
            let user = insert_user(&mut tx, new_user).await?;
            invitation::insert(&mut tx, invitation_hash, user.id, user.created_at + ttl).await?;
            commit(tx).await?;

            info!(user_id = user.id, "Created inactive user with pending invitation");
            Ok(user)
        })
        .await
    }

    async fn activate(&self, plaintext_token: &str) -> AppResult<User> {
        let token_hash = hash_token(plaintext_token);

        bounded(self.query_timeout, "user.activate", async {
            let mut tx = self.begin().await?;

            let user_id = invitation::find_redeemable_user(&mut tx, &token_hash)
                .await?
                .ok_or_else(|| AppError::not_found("Invitation not found"))?;

            sqlx::query("UPDATE users SET is_active = TRUE WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to activate user", e)
                })?;
            invitation::delete_for_user(&mut tx, user_id).await?;

            let user = fetch_any(&mut *tx, user_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User {user_id} not found")))?;
            commit(tx).await?;

            info!(user_id, "User activated");
            Ok(user)
        })
        .await
    }

    async fn delete(&self, user_id: i64) -> AppResult<()> {
        bounded(self.query_timeout, "user.delete", async {
            let mut tx = self.begin().await?;

            let invitations = invitation::delete_for_user(&mut tx, user_id).await?;
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to delete user", e))?;

            if result.rows_affected() == 0 {
                return Err(AppError::not_found(format!("User {user_id} not found")));
            }
            commit(tx).await?;

            debug!(user_id, invitations, "User deleted");
            Ok(())
        })
        .await
    }
}

/// Insert a user row after resolving its role, returning the full record.
async fn insert_user(conn: &mut PgConnection, new_user: &NewUser) -> AppResult<User> {
    let role_name = new_user.role_name();
    let role = role::fetch_by_name(&mut *conn, role_name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Role '{role_name}' not found")))?;

    let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
        "INSERT INTO users (username, email, password_hash, role_id) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, created_at",
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(role.id)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_insert_error(e, "Failed to create user"))?;

    Ok(User {
        id,
        username: new_user.username.clone(),
        email: new_user.email.clone(),
        password_hash: new_user.password_hash.clone(),
        is_active: false,
        role,
        created_at,
    })
}

/// Load a user regardless of its active flag.
async fn fetch_any<'c, E>(executor: E, id: i64) -> AppResult<Option<User>>
where
    E: PgExecutor<'c>,
{
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT u.id, u.username, u.email, u.password_hash, u.is_active, u.created_at, \
                r.id AS role_id, r.name AS role_name, r.level AS role_level, \
                r.description AS role_description \
         FROM users u JOIN roles r ON r.id = u.role_id \
         WHERE u.id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to load user", e))?;
    Ok(row.map(User::from))
}

async fn commit(tx: sqlx::Transaction<'static, sqlx::Postgres>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to commit transaction", e))
}
