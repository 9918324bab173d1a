//! User self-service: login, activation, lookup, deletion.

pub mod service;

pub use service::UserService;
