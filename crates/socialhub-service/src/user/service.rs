//! User self-service operations.

use std::sync::Arc;

use tracing::{info, warn};

use socialhub_auth::jwt::TokenAuthenticator;
use socialhub_auth::password::PasswordHasher;
use socialhub_auth::rbac::RoleAuthorizer;
use socialhub_cache::UserCache;
use socialhub_core::error::{AppError, ErrorKind};
use socialhub_core::result::AppResult;
use socialhub_database::UserDirectory;
use socialhub_entity::token::AccessToken;
use socialhub_entity::user::User;

use crate::context::RequestContext;

/// Role required to delete somebody else's account.
pub const DELETE_OTHERS_ROLE: &str = "admin";

/// Handles login, activation and account removal.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User directory.
    directory: Arc<dyn UserDirectory>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Token issuer.
    authenticator: Arc<TokenAuthenticator>,
    /// Role precedence checks.
    authorizer: Arc<RoleAuthorizer>,
    /// User cache to invalidate on removal.
    cache: Option<Arc<dyn UserCache>>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        authenticator: Arc<TokenAuthenticator>,
        authorizer: Arc<RoleAuthorizer>,
    ) -> Self {
        Self {
            directory,
            hasher: PasswordHasher::new(),
            authenticator,
            authorizer,
            cache: None,
        }
    }

    /// Invalidate `cache` whenever a user is removed.
    pub fn with_cache(mut self, cache: Arc<dyn UserCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Exchange email and password for a bearer token.
    ///
    /// Unknown, inactive and wrong-password logins all fail the same way.
    pub async fn issue_token(&self, email: &str, password: &str) -> AppResult<AccessToken> {
        let user = self.directory.get_by_email(email).await.map_err(|e| {
            if e.is_not_found() {
                AppError::unauthorized("Invalid credentials")
            } else {
                e
            }
        })?;

        self.verify(password.to_string(), user.password_hash.clone())
            .await
            .map_err(|e| match e.kind {
                ErrorKind::CredentialMismatch => AppError::unauthorized("Invalid credentials"),
                _ => e,
            })?;

        let token = self.authenticator.issue_for(user.id)?;
        info!(user_id = user.id, "Token issued");
        Ok(token)
    }

    /// Redeem an activation invitation.
    pub async fn activate(&self, plaintext_token: &str) -> AppResult<User> {
        self.directory.activate(plaintext_token).await
    }

    /// Delete a user account.
    ///
    /// Users may delete themselves; deleting anyone else requires
    /// [`DELETE_OTHERS_ROLE`]. The cached copy is invalidated best-effort.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: i64) -> AppResult<()> {
        self.authorizer
            .authorize_mutation(ctx.user(), user_id, DELETE_OTHERS_ROLE)
            .await?;

        self.directory.delete(user_id).await?;
        info!(user_id, actor_id = ctx.user_id(), "User deleted");

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(user_id).await {
                warn!(user_id, error = %e, "Failed to invalidate cached user");
            }
        }
        Ok(())
    }

    async fn verify(&self, password: String, hash: String) -> AppResult<()> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?
    }
}
