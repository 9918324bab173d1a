//! # socialhub-service
//!
//! Application-level use cases for SocialHub: resolving bearer tokens to
//! users, the registration saga, invitation delivery, and user
//! self-service.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references to the capability traits.

pub mod context;
pub mod identity;
pub mod notification;
pub mod registration;
pub mod user;

pub use context::RequestContext;
pub use identity::IdentityResolver;
pub use notification::{ConsoleNotifier, HttpNotifier, RetryingNotifier};
pub use registration::{RegisterUser, RegistrationSettings, RegistrationState, RegistrationWorkflow};
pub use user::UserService;
