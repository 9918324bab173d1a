//! Capability traits for the user directory.
//!
//! Readers only need [`UserReader`]; the registration and activation flows
//! need the full [`UserDirectory`]. Role lookups are separate because the
//! authorizer never touches users.

use std::time::Duration;

use async_trait::async_trait;

use socialhub_core::result::AppResult;
use socialhub_entity::user::{NewUser, Role, User};

/// Read access to active users.
#[async_trait]
pub trait UserReader: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch an active user by id. Absent and inactive users are `NotFound`.
    async fn get_by_id(&self, id: i64) -> AppResult<User>;

    /// Fetch an active user by email. Absent and inactive users are `NotFound`.
    async fn get_by_email(&self, email: &str) -> AppResult<User>;
}

/// The durable user directory.
#[async_trait]
pub trait UserDirectory: UserReader {
    /// Persist a new inactive user.
    ///
    /// Fails with `DuplicateEmail` / `DuplicateUsername` on a uniqueness
    /// violation and `NotFound` when the requested role does not exist.
    async fn create(&self, new_user: &NewUser) -> AppResult<User>;

    /// Persist a new inactive user and its invitation as one atomic unit.
    ///
    /// The invitation expires `ttl` after creation. Either both rows exist
    /// afterwards or neither does.
    async fn create_and_invite(
        &self,
        new_user: &NewUser,
        invitation_hash: &str,
        ttl: Duration,
    ) -> AppResult<User>;

    /// Redeem an invitation: mark its user active and consume the invitation.
    ///
    /// Expired, consumed and unknown invitations are all `NotFound`.
    async fn activate(&self, plaintext_token: &str) -> AppResult<User>;

    /// Remove a user together with any pending invitations.
    async fn delete(&self, user_id: i64) -> AppResult<()>;
}

/// Role reference data lookup.
#[async_trait]
pub trait RoleStore: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve a role by name. Unknown names are `NotFound`.
    async fn get_by_name(&self, name: &str) -> AppResult<Role>;
}
