use std::collections::HashSet;

use punchcard_core::{DomainError, DomainResult};

use crate::{Account, Role};

/// Configured set of administrator emails.
///
/// Membership is an exact string match. The list is injected at startup, so
/// rotating administrators is a configuration change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowlist {
    emails: HashSet<String>,
}

impl AdminAllowlist {
    pub fn new<I, E>(emails: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<String>,
    {
        Self {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// An allowlist that grants nobody the administrator role.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Pure role check: no IO, no lookups.
    pub fn is_administrator(&self, account: &Account) -> bool {
        self.contains(&account.email)
    }

    pub fn role_of(&self, account: &Account) -> Role {
        if self.is_administrator(account) {
            Role::Administrator
        } else {
            Role::Member
        }
    }

    /// Require the administrator role.
    pub fn authorize(&self, account: &Account) -> DomainResult<()> {
        if self.is_administrator(account) {
            Ok(())
        } else {
            Err(DomainError::Unauthorized)
        }
    }
}
