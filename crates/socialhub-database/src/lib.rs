//! # socialhub-database
//!
//! PostgreSQL connection management, the user directory traits, and their
//! implementations: the PostgreSQL repositories and an in-process
//! directory with the same semantics for tests and local runs.

pub mod connection;
pub mod directory;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use directory::{RoleStore, UserDirectory, UserReader};
pub use memory::MemoryUserDirectory;
pub use repositories::{RoleRepository, UserRepository};
