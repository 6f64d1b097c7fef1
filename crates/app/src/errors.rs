use serde::Serialize;

use punchcard_core::DomainError;

/// Error as shown to the person holding the phone: a stable code plus a
/// short message.
///
/// Unknown email and wrong password share one message so the login screen
/// cannot be used to probe which emails are registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFacingError {
    pub code: &'static str,
    pub message: String,
}

impl UserFacingError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&DomainError> for UserFacingError {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::Validation(_) => Self::new("validation_error", "Please fill in all fields"),
            DomainError::DuplicateAccount(_) => Self::new(
                "duplicate_account",
                "An account with this email already exists",
            ),
            DomainError::InvalidCredentials => {
                Self::new("invalid_credentials", "Invalid email or password")
            }
            DomainError::NoActiveSession => Self::new("no_active_session", "Please sign in"),
            DomainError::InsufficientPunches { have, need } => Self::new(
                "insufficient_punches",
                format!("Collect {} more punches to redeem", need.saturating_sub(*have)),
            ),
            DomainError::AccountNotFound(_) => Self::new("not_found", "User not found"),
            DomainError::InvalidAction(_) => Self::new("invalid_action", "Invalid action"),
            DomainError::Unauthorized => Self::new(
                "unauthorized",
                "You do not have permission to access the admin dashboard",
            ),
        }
    }
}

impl From<DomainError> for UserFacingError {
    fn from(err: DomainError) -> Self {
        Self::from(&err)
    }
}

impl core::fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
