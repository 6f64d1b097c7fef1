use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use punchcard_core::AccountId;

/// Opaque credential material.
///
/// Compared by exact equality; never serialised and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordSecret(String);

impl PasswordSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Debug for PasswordSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordSecret(***)")
    }
}

impl From<&str> for PasswordSecret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PasswordSecret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Public identity record.
///
/// This is everything about an account that may leave the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Stored form of an account: the public record plus its secret.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    account: Account,
    secret: PasswordSecret,
}

impl AccountRecord {
    pub(crate) fn new(account: Account, secret: PasswordSecret) -> Self {
        Self { account, secret }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub(crate) fn matches(&self, email: &str, secret: &PasswordSecret) -> bool {
        self.account.email == email && &self.secret == secret
    }
}
