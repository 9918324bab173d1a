//! Bearer token to user resolution with a cache-aside read path.

use std::sync::Arc;

use tracing::{debug, warn};

use socialhub_auth::jwt::TokenAuthenticator;
use socialhub_cache::UserCache;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_database::UserReader;
use socialhub_entity::user::User;

use crate::context::RequestContext;

/// Resolves bearer tokens to active users.
///
/// Lookups go through the user cache when one is configured. Cache errors
/// and timeouts degrade to a direct directory read; they never fail the
/// request.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    authenticator: Arc<TokenAuthenticator>,
    users: Arc<dyn UserReader>,
    cache: Option<Arc<dyn UserCache>>,
}

impl IdentityResolver {
    /// Creates a resolver reading straight from the directory.
    pub fn new(authenticator: Arc<TokenAuthenticator>, users: Arc<dyn UserReader>) -> Self {
        Self {
            authenticator,
            users,
            cache: None,
        }
    }

    /// Put a user cache in front of the directory.
    pub fn with_cache(mut self, cache: Arc<dyn UserCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Validate `token` and load the user it names.
    ///
    /// A user that no longer exists (or is inactive) is `Unauthorized`,
    /// indistinguishable from a bad token for the caller.
    pub async fn resolve(&self, token: &str) -> AppResult<User> {
        let user_id = self
            .authenticator
            .validate_token(token)
            .and_then(|claims| claims.user_id())
            .inspect_err(|e| debug!(fault = ?e.token_fault(), "Bearer token rejected"))?;

        self.load_user(user_id).await.map_err(|e| {
            if e.is_not_found() {
                AppError::unauthorized("Unknown subject")
            } else {
                e
            }
        })
    }

    /// Resolve an `Authorization` header value of the form `Bearer <token>`.
    pub async fn resolve_bearer(&self, header: &str) -> AppResult<User> {
        let token = parse_bearer(header)?;
        self.resolve(token).await
    }

    /// Resolve a token into a [`RequestContext`].
    pub async fn resolve_context(&self, token: &str) -> AppResult<RequestContext> {
        self.resolve(token).await.map(RequestContext::new)
    }

    /// Cache-aside user lookup by id.
    pub async fn load_user(&self, user_id: i64) -> AppResult<User> {
        let Some(cache) = &self.cache else {
            return self.users.get_by_id(user_id).await;
        };

        match cache.get(user_id).await {
            Ok(Some(user)) => return Ok(user),
            Ok(None) => {}
            Err(e) => {
                warn!(user_id, error = %e, "User cache read failed, reading directory");
            }
        }

        let user = self.users.get_by_id(user_id).await?;

        if let Err(e) = cache.set(&user).await {
            warn!(user_id, error = %e, "Failed to populate user cache");
        } else {
            debug!(user_id, "User cache populated");
        }

        Ok(user)
    }
}

/// Extract the token from `Bearer <token>`.
fn parse_bearer(header: &str) -> AppResult<&str> {
    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::unauthorized("Authorization header is malformed")),
    }
}
