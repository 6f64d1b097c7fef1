//! Domain error model.

use thiserror::Error;

use crate::id::AccountId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a deterministic business failure reported to the caller;
/// none of them are retried and none are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an empty registration field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An account with the given email is already registered.
    #[error("an account with email '{0}' already exists")]
    DuplicateAccount(String),

    /// No account matches the supplied email and secret.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Nobody is signed in on the session.
    #[error("no active session")]
    NoActiveSession,

    /// Redemption requires a full card.
    #[error("insufficient punches: have {have}, need {need}")]
    InsufficientPunches { have: u8, need: u8 },

    /// Lookup of an unknown account id.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// An administrative action name that is not recognised.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// The acting account lacks the administrator role.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn duplicate_account(email: impl Into<String>) -> Self {
        Self::DuplicateAccount(email.into())
    }

    pub fn invalid_action(action: impl Into<String>) -> Self {
        Self::InvalidAction(action.into())
    }

    pub fn account_not_found(id: AccountId) -> Self {
        Self::AccountNotFound(id)
    }
}
