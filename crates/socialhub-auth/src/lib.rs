//! # socialhub-auth
//!
//! Authentication and authorization primitives for SocialHub.
//!
//! ## Modules
//!
//! - `jwt`: bearer token claims, signing, and validation
//! - `password`: Argon2id password hashing and policy enforcement
//! - `rbac`: role precedence checks with the ownership short-circuit

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenAuthenticator};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::RoleAuthorizer;
