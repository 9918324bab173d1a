//! # socialhub-entity
//!
//! Domain entity models for SocialHub. Every struct in this crate
//! represents a database row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`; row types
//! additionally derive `sqlx::FromRow`.

pub mod invitation;
pub mod token;
pub mod user;
