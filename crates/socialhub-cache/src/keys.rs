//! Cache key builders for all SocialHub cache entries.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. Backend-level prefixes
//! (e.g. the Redis `key_prefix`) are applied by the provider.

/// Cache key for a user entity by ID.
pub fn user_by_id(user_id: i64) -> String {
    format!("user:{user_id}")
}
