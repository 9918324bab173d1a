//! Register, invite, notify; delete again if the invitation cannot be sent.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};
use validator::Validate;

use socialhub_auth::password::{PasswordHasher, PasswordValidator};
use socialhub_core::config::AppConfig;
use socialhub_core::error::AppError;
use socialhub_core::result::AppResult;
use socialhub_core::traits::Notifier;
use socialhub_database::UserDirectory;
use socialhub_entity::invitation::InvitationToken;
use socialhub_entity::user::{NewUser, User};

use super::state::RegistrationState;
use crate::notification::{INVITATION_TEMPLATE, is_success};

/// A registration request.
#[derive(Clone, Deserialize, Validate)]
pub struct RegisterUser {
    /// Desired username.
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,
    /// Email address.
    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,
    /// Plaintext password; checked by the configured password policy.
    pub password: String,
}

impl fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Settings the workflow needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    /// How long an invitation stays redeemable.
    pub invitation_ttl: Duration,
    /// Base URL the activation link points into.
    pub frontend_url: String,
    /// Ask the delivery service not to actually deliver.
    pub sandbox: bool,
}

impl RegistrationSettings {
    /// Derive settings from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            invitation_ttl: Duration::from_secs(config.auth.invitation_ttl_hours * 3600),
            frontend_url: config.mail.frontend_url.clone(),
            sandbox: !config.is_production(),
        }
    }

    fn activation_url(&self, plaintext: &str) -> String {
        format!("{}/confirm/{plaintext}", self.frontend_url.trim_end_matches('/'))
    }
}

/// The registration saga.
///
/// The user and its invitation are committed atomically, then the
/// invitation is delivered. If delivery fails the user is deleted again
/// (one attempt). The plaintext invitation exists only for the duration of
/// [`register`](Self::register) and is never returned.
#[derive(Debug, Clone)]
pub struct RegistrationWorkflow {
    directory: Arc<dyn UserDirectory>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    notifier: Arc<dyn Notifier>,
    settings: RegistrationSettings,
}

impl RegistrationWorkflow {
    /// Creates a new registration workflow.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        validator: PasswordValidator,
        notifier: Arc<dyn Notifier>,
        settings: RegistrationSettings,
    ) -> Self {
        Self {
            directory,
            hasher: PasswordHasher::new(),
            validator,
            notifier,
            settings,
        }
    }

    /// Register a new inactive user and send its activation invitation.
    ///
    /// Duplicate email or username surfaces as the matching conflict.
    /// A delivery failure surfaces as `ExternalService` after compensation.
    pub async fn register(&self, request: RegisterUser) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        self.validator.validate(
            &request.password,
            &[request.username.as_str(), request.email.as_str()],
        )?;

        let password_hash = self.hash(request.password).await?;
        let invitation = InvitationToken::generate();
        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role_name: None,
        };

        let mut state = RegistrationState::Pending;
        let user = self
            .directory
            .create_and_invite(&new_user, invitation.hash(), self.settings.invitation_ttl)
            .await?;
        state = state.registered(user.id)?;
        info!(user_id = user.id, state = %state, "Registration committed");

        let vars = json!({
            "username": user.username,
            "activation_url": self.settings.activation_url(invitation.plaintext()),
        });
        drop(invitation);

        let delivery = self
            .notifier
            .send(
                INVITATION_TEMPLATE,
                &user.username,
                &user.email,
                &vars,
                self.settings.sandbox,
            )
            .await;

        let failure = match delivery {
            Ok(status) if is_success(status) => {
                state = state.notified()?;
                info!(user_id = user.id, state = %state, status, "Invitation sent");
                return Ok(user);
            }
            Ok(status) => {
                AppError::external_service(format!("Notifier responded with status {status}"))
            }
            Err(e) => e,
        };

        warn!(user_id = user.id, error = %failure, "Invitation delivery failed, compensating");
        let deleted = self.directory.delete(user.id).await;
        state = state.compensated(deleted.is_ok())?;

        match deleted {
            Ok(()) => info!(user_id = user.id, state = %state, "Registration rolled back"),
            Err(e) => error!(
                user_id = user.id,
                state = %state,
                error = %e,
                "Compensating delete failed; inactive user left behind"
            ),
        }

        Err(AppError::external_service(format!(
            "Failed to send invitation email: {}",
            failure.message
        )))
    }

    async fn hash(&self, password: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }
}
