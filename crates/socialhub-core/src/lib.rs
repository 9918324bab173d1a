//! # socialhub-core
//!
//! Core crate for SocialHub. Contains the unified error system,
//! configuration schemas, and the backend traits (cache provider,
//! notifier) that the other crates implement or consume.
//!
//! This crate has **no** internal dependencies on other SocialHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind, TokenFault};
pub use result::AppResult;
