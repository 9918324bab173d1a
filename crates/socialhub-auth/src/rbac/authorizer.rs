//! Role precedence enforcement for mutating operations.

use std::sync::Arc;

use tracing::debug;

use socialhub_core::error::AppError;
use socialhub_database::RoleStore;
use socialhub_entity::user::{Role, User};

/// Compares a subject's role against a required role by precedence level.
#[derive(Debug, Clone)]
pub struct RoleAuthorizer {
    roles: Arc<dyn RoleStore>,
}

impl RoleAuthorizer {
    /// Creates an authorizer resolving role names through `roles`.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Whether `subject_role` is at least as privileged as `required_role`.
    ///
    /// An unknown required role is `NotFound`; that is a configuration
    /// mistake in the caller, not a denial.
    pub async fn check_precedence(
        &self,
        subject_role: &Role,
        required_role: &str,
    ) -> Result<bool, AppError> {
        let required = self.roles.get_by_name(required_role).await?;
        Ok(subject_role.has_at_least(&required))
    }

    /// Like [`check_precedence`](Self::check_precedence) but denial is `Forbidden`.
    pub async fn require_role(
        &self,
        subject_role: &Role,
        required_role: &str,
    ) -> Result<(), AppError> {
        if self.check_precedence(subject_role, required_role).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{}' is insufficient; minimum required: '{required_role}'",
                subject_role.name
            )))
        }
    }

    /// Gate a mutation of a resource owned by `owner_id`.
    ///
    /// The owner is always allowed. Anyone else needs at least `required_role`.
    pub async fn authorize_mutation(
        &self,
        actor: &User,
        owner_id: i64,
        required_role: &str,
    ) -> Result<(), AppError> {
        if actor.owns(owner_id) {
            debug!(user_id = actor.id, "Owner mutation allowed");
            return Ok(());
        }
        self.require_role(&actor.role, required_role).await
    }
}
