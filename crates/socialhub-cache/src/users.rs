//! Cache-aside storage for user records.
//!
//! Entries are JSON copies of [`User`] keyed by id. The password hash is
//! never serialized, so a cached user carries no credential. Every call is
//! bounded by the configured operation timeout; callers decide whether a
//! failure is fatal (the identity read path treats it as a miss).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use socialhub_core::config::CacheConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::traits::cache::{self, CacheProvider};
use socialhub_entity::user::User;

use crate::keys;

/// Single-entity user cache.
#[async_trait]
pub trait UserCache: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch a cached user. A miss is `Ok(None)`.
    async fn get(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Store a user, overwriting any previous entry with a fresh TTL.
    async fn set(&self, user: &User) -> AppResult<()>;

    /// Invalidate a user entry.
    async fn delete(&self, user_id: i64) -> AppResult<()>;
}

/// [`UserCache`] backed by any [`CacheProvider`].
#[derive(Debug, Clone)]
pub struct UserCacheStore {
    provider: Arc<dyn CacheProvider>,
    ttl: Duration,
    operation_timeout: Duration,
}

impl UserCacheStore {
    /// Create a user cache with explicit TTL and per-call timeout.
    pub fn new(provider: Arc<dyn CacheProvider>, ttl: Duration, operation_timeout: Duration) -> Self {
        Self {
            provider,
            ttl,
            operation_timeout,
        }
    }

    /// Create a user cache using the TTL and timeout from configuration.
    pub fn from_config(provider: Arc<dyn CacheProvider>, config: &CacheConfig) -> Self {
        Self::new(
            provider,
            Duration::from_secs(config.default_ttl_seconds),
            Duration::from_millis(config.operation_timeout_ms),
        )
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        tokio::time::timeout(self.operation_timeout, fut)
            .await
            .unwrap_or_else(|_| {
                Err(AppError::cache(format!(
                    "Cache {operation} timed out after {}ms",
                    self.operation_timeout.as_millis()
                )))
            })
    }
}

#[async_trait]
impl UserCache for UserCacheStore {
    async fn get(&self, user_id: i64) -> AppResult<Option<User>> {
        let key = keys::user_by_id(user_id);
        let cached: Option<User> = self
            .bounded("get", cache::get_json(self.provider.as_ref(), &key))
            .await?;
        match &cached {
            Some(_) => debug!(user_id, "User cache hit"),
            None => debug!(user_id, "User cache miss"),
        }
        Ok(cached)
    }

    async fn set(&self, user: &User) -> AppResult<()> {
        let key = keys::user_by_id(user.id);
        self.bounded(
            "set",
            cache::set_json(self.provider.as_ref(), &key, user, self.ttl),
        )
        .await
    }

    async fn delete(&self, user_id: i64) -> AppResult<()> {
        let key = keys::user_by_id(user_id);
        self.bounded("delete", self.provider.delete(&key)).await
    }
}
