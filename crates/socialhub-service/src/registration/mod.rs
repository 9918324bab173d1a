//! Account registration saga.

pub mod state;
pub mod workflow;

pub use state::RegistrationState;
pub use workflow::{RegisterUser, RegistrationSettings, RegistrationWorkflow};
