//! Request context carrying the authenticated user.

use socialhub_entity::user::User;

/// Context for the current authenticated request.
///
/// Produced by [`IdentityResolver`](crate::identity::IdentityResolver) and
/// passed into service methods so that every operation knows *who* is
/// acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The resolved, active user.
    user: User,
}

impl RequestContext {
    /// Creates a new request context for `user`.
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The authenticated user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The authenticated user's ID.
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}
