//! # socialhub-cache
//!
//! Cache provider implementations for SocialHub. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//!   with per-entry TTL
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. On top of
//! it, [`users::UserCacheStore`] implements the cache-aside user cache.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
pub mod users;

pub use provider::CacheManager;
pub use users::{UserCache, UserCacheStore};
