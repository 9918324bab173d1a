//! Password policy enforcement for new passwords.

use socialhub_core::config::AuthConfig;
use socialhub_core::error::AppError;

/// Validates passwords against configured length and strength policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    max_length: usize,
    /// zxcvbn score floor; 0 disables the entropy check.
    min_score: u8,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
            min_score: config.password_min_score.min(4),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation found. `user_inputs` (username, email)
    /// are penalised by the strength estimate.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if length > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }

        if self.min_score > 0 {
            let estimate = zxcvbn::zxcvbn(password, user_inputs);
            if (estimate.score() as u8) < self.min_score {
                return Err(AppError::validation(
                    "Password is too weak. Please use a stronger password with more entropy.",
                ));
            }
        }

        Ok(())
    }
}
