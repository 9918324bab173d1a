//! Invitation delivery: transports and the retry wrapper.

pub mod console;
pub mod http;
pub mod retry;

pub use console::ConsoleNotifier;
pub use http::HttpNotifier;
pub use retry::RetryingNotifier;

/// Template used for account activation invitations.
pub const INVITATION_TEMPLATE: &str = "user_invitation";

/// Whether a delivery status code counts as delivered.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}
