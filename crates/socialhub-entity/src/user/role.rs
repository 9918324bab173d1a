//! Role reference data.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role assigned at registration when none is requested.
pub const DEFAULT_ROLE: &str = "user";

/// A named role with a precedence level.
///
/// Levels are ordered: a higher level permits everything a lower level
/// permits. Seeded roles are `user` (1), `moderator` (2) and `admin` (3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Role identifier.
    pub id: i64,
    /// Unique role name.
    pub name: String,
    /// Precedence level (higher = more privileged).
    pub level: i64,
    /// Human-readable description.
    pub description: String,
}

impl Role {
    /// Build a role value.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        level: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            description: description.into(),
        }
    }

    /// The roles seeded by the initial migration.
    pub fn seeded() -> Vec<Role> {
        vec![
            Role::new(1, "user", 1, "A user can create posts and comments"),
            Role::new(2, "moderator", 2, "A moderator can update other users posts"),
            Role::new(3, "admin", 3, "An admin can update and delete other users posts"),
        ]
    }

    /// Check if this role has at least the given role's precedence.
    pub fn has_at_least(&self, other: &Role) -> bool {
        self.level >= other.level
    }
}
