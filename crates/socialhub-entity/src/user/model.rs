//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// A registered user in the SocialHub system.
///
/// The password hash is never serialized, so cached and exported copies of
/// a user carry an empty credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier. Never reused.
    pub id: i64,
    /// Unique display name.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// `false` until the invitation has been redeemed.
    pub is_active: bool,
    /// Resolved role.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether this user owns a resource owned by `owner_id`.
    pub fn owns(&self, owner_id: i64) -> bool {
        self.id == owner_id
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Role name; `None` assigns [`DEFAULT_ROLE`](super::role::DEFAULT_ROLE).
    pub role_name: Option<String>,
}

impl NewUser {
    /// The role name to resolve at creation time.
    pub fn role_name(&self) -> &str {
        self.role_name
            .as_deref()
            .unwrap_or(super::role::DEFAULT_ROLE)
    }
}
