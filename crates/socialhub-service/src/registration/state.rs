//! Registration saga states.
//!
//! ```text
//! Pending -> Registered -> Notified
//!                       -> CompensatedDelete
//!                       -> CompensationFailed
//! ```

use std::fmt;

use socialhub_core::error::AppError;

/// Where a registration currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// Nothing has been persisted yet.
    Pending,
    /// The inactive user and its invitation are committed.
    Registered { user_id: i64 },
    /// The invitation was delivered. Terminal.
    Notified { user_id: i64 },
    /// Delivery failed and the user was deleted again. Terminal.
    CompensatedDelete { user_id: i64 },
    /// Delivery failed and so did the compensating delete. Terminal; the
    /// record needs manual cleanup.
    CompensationFailed { user_id: i64 },
}

impl RegistrationState {
    /// The durable write committed.
    pub fn registered(self, user_id: i64) -> Result<Self, AppError> {
        match self {
            Self::Pending => Ok(Self::Registered { user_id }),
            other => Err(other.invalid("registered")),
        }
    }

    /// The invitation was delivered.
    pub fn notified(self) -> Result<Self, AppError> {
        match self {
            Self::Registered { user_id } => Ok(Self::Notified { user_id }),
            other => Err(other.invalid("notified")),
        }
    }

    /// Delivery failed; record the outcome of the compensating delete.
    pub fn compensated(self, delete_succeeded: bool) -> Result<Self, AppError> {
        match self {
            Self::Registered { user_id } if delete_succeeded => {
                Ok(Self::CompensatedDelete { user_id })
            }
            Self::Registered { user_id } => Ok(Self::CompensationFailed { user_id }),
            other => Err(other.invalid("compensated")),
        }
    }

    fn invalid(self, event: &str) -> AppError {
        AppError::internal(format!("Invalid registration transition: {self} -> {event}"))
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Registered { .. } => write!(f, "registered"),
            Self::Notified { .. } => write!(f, "notified"),
            Self::CompensatedDelete { .. } => write!(f, "compensated_delete"),
            Self::CompensationFailed { .. } => write!(f, "compensation_failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path() {
        let state = RegistrationState::Pending.registered(7).unwrap();
        assert_eq!(state, RegistrationState::Registered { user_id: 7 });

        let state = state.notified().unwrap();
        assert_eq!(state, RegistrationState::Notified { user_id: 7 });
    }

    #[test]
    fn test_compensation_paths() {
        let registered = RegistrationState::Pending.registered(3).unwrap();
        assert_eq!(
            registered.compensated(true).unwrap(),
            RegistrationState::CompensatedDelete { user_id: 3 }
        );
        assert_eq!(
            registered.compensated(false).unwrap(),
            RegistrationState::CompensationFailed { user_id: 3 }
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(RegistrationState::Pending.notified().is_err());
        assert!(RegistrationState::Pending.compensated(true).is_err());
        let done = RegistrationState::Notified { user_id: 1 };
        assert!(done.registered(2).is_err());
        assert!(done.compensated(true).is_err());
    }
}
