//! Account directory: registration, login and identity queries.

use chrono::Utc;

use punchcard_core::{AccountId, DomainError, DomainResult, KeyValueStore};

use crate::{Account, AccountRecord, AdminAllowlist, PasswordSecret, Role, Session};

/// Holds the registered accounts and answers identity/role questions.
///
/// # Invariants
/// - `email` is unique across accounts.
/// - Accounts are never deleted and their `name`/`email` never change.
/// - Secrets never leave the directory; callers only see [`Account`].
pub struct AccountDirectory<S> {
    store: S,
    allowlist: AdminAllowlist,
}

impl<S> AccountDirectory<S>
where
    S: KeyValueStore<AccountId, AccountRecord>,
{
    pub fn new(store: S, allowlist: AdminAllowlist) -> Self {
        Self { store, allowlist }
    }

    pub fn allowlist(&self) -> &AdminAllowlist {
        &self.allowlist
    }

    /// Register a new account and make it the session's identity.
    pub fn register(
        &self,
        session: &mut Session,
        name: &str,
        email: &str,
        secret: impl Into<PasswordSecret>,
    ) -> DomainResult<Account> {
        let secret = secret.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        if secret.is_blank() {
            return Err(DomainError::validation("password cannot be empty"));
        }

        if self.find_by_email(email).is_some() {
            tracing::debug!(email, "registration rejected: duplicate email");
            return Err(DomainError::duplicate_account(email));
        }

        let account = Account {
            id: AccountId::new(),
            name: name.trim().to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.store
            .put(account.id, AccountRecord::new(account.clone(), secret));
        session.activate(account.id);

        tracing::info!(account_id = %account.id, "account registered");
        Ok(account)
    }

    /// Log in with an exact email + secret match.
    ///
    /// On failure the session is left untouched and the error does not say
    /// whether the email or the secret was wrong.
    pub fn authenticate(
        &self,
        session: &mut Session,
        email: &str,
        secret: impl Into<PasswordSecret>,
    ) -> DomainResult<Account> {
        let secret = secret.into();
        let record = self
            .store
            .list()
            .into_iter()
            .find(|r| r.matches(email, &secret));

        match record {
            Some(record) => {
                let account = record.account().clone();
                session.activate(account.id);
                tracing::info!(account_id = %account.id, "account authenticated");
                Ok(account)
            }
            None => {
                tracing::warn!("authentication failed");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// Resolve the session's identity.
    pub fn current_session(&self, session: &Session) -> DomainResult<Account> {
        let id = session.account_id().ok_or(DomainError::NoActiveSession)?;
        self.get(id)
    }

    pub fn sign_out(&self, session: &mut Session) {
        if let Some(id) = session.account_id() {
            tracing::info!(account_id = %id, "signed out");
        }
        session.sign_out();
    }

    pub fn is_administrator(&self, account: &Account) -> bool {
        self.allowlist.is_administrator(account)
    }

    pub fn role_of(&self, account: &Account) -> Role {
        self.allowlist.role_of(account)
    }

    pub fn get(&self, id: AccountId) -> DomainResult<Account> {
        self.store
            .get(&id)
            .map(|r| r.account().clone())
            .ok_or(DomainError::account_not_found(id))
    }

    /// All accounts in registration order.
    pub fn list(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .store
            .list()
            .into_iter()
            .map(|r| r.account().clone())
            .collect();
        accounts.sort_by_key(|a| (a.created_at, a.id));
        accounts
    }

    /// Case-insensitive substring match on name or email.
    ///
    /// A blank query matches every account.
    pub fn search(&self, query: &str) -> Vec<Account> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list();
        }
        self.list()
            .into_iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle) || a.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn find_by_email(&self, email: &str) -> Option<Account> {
        self.store
            .list()
            .into_iter()
            .map(|r| r.account().clone())
            .find(|a| a.email == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use punchcard_infra::InMemoryStore;
    use std::sync::Arc;

    fn directory() -> AccountDirectory<Arc<InMemoryStore<AccountId, AccountRecord>>> {
        AccountDirectory::new(
            Arc::new(InMemoryStore::new()),
            AdminAllowlist::new(["admin@x.io"]),
        )
    }

    #[test]
    fn register_activates_session() {
        let directory = directory();
        let mut session = Session::new();

        let account = directory
            .register(&mut session, "Alice", "alice@example.com", "s3cret")
            .unwrap();

        assert_eq!(session.account_id(), Some(account.id));
        assert_eq!(directory.current_session(&session).unwrap(), account);
    }

    #[test]
    fn duplicate_email_is_rejected_and_first_account_kept() {
        let directory = directory();
        let mut session = Session::new();
        let first = directory
            .register(&mut session, "Alice", "alice@example.com", "one")
            .unwrap();

        let mut other = Session::new();
        let err = directory
            .register(&mut other, "Impostor", "alice@example.com", "two")
            .unwrap_err();

        assert_eq!(err, DomainError::DuplicateAccount("alice@example.com".to_string()));
        assert!(!other.is_active());
        assert_eq!(directory.list(), vec![first.clone()]);
        assert_eq!(directory.get(first.id).unwrap().name, "Alice");
    }

    #[test]
    fn blank_fields_fail_validation() {
        let directory = directory();
        let mut session = Session::new();

        for (name, email, secret) in [
            ("", "a@x.io", "pw"),
            ("A", "  ", "pw"),
            ("A", "a@x.io", " "),
        ] {
            let err = directory
                .register(&mut session, name, email, secret)
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
        assert!(directory.list().is_empty());
    }

    #[test]
    fn authenticate_with_correct_credentials() {
        let directory = directory();
        let mut session = Session::new();
        let account = directory
            .register(&mut session, "Alice", "alice@example.com", "s3cret")
            .unwrap();
        directory.sign_out(&mut session);

        let logged_in = directory
            .authenticate(&mut session, "alice@example.com", "s3cret")
            .unwrap();
        assert_eq!(logged_in, account);
        assert_eq!(session.account_id(), Some(account.id));
    }

    #[test]
    fn wrong_secret_leaves_session_unchanged() {
        let directory = directory();
        let mut session = Session::new();
        let alice = directory
            .register(&mut session, "Alice", "alice@example.com", "s3cret")
            .unwrap();
        let mut bob_session = Session::new();
        directory
            .register(&mut bob_session, "Bob", "bob@example.com", "pw")
            .unwrap();

        let err = directory
            .authenticate(&mut session, "bob@example.com", "wrong")
            .unwrap_err();

        assert_eq!(err, DomainError::InvalidCredentials);
        assert_eq!(session.account_id(), Some(alice.id));
    }

    #[test]
    fn unknown_email_and_wrong_secret_are_indistinguishable() {
        let directory = directory();
        let mut session = Session::new();
        directory
            .register(&mut session, "Alice", "alice@example.com", "s3cret")
            .unwrap();

        let unknown = directory
            .authenticate(&mut session, "nobody@example.com", "s3cret")
            .unwrap_err();
        let wrong = directory
            .authenticate(&mut session, "alice@example.com", "nope")
            .unwrap_err();
        assert_eq!(unknown, wrong);
    }

    #[test]
    fn current_session_requires_login() {
        let directory = directory();
        let mut session = Session::new();
        assert_eq!(
            directory.current_session(&session),
            Err(DomainError::NoActiveSession)
        );

        directory
            .register(&mut session, "Alice", "alice@example.com", "pw")
            .unwrap();
        directory.sign_out(&mut session);
        directory.sign_out(&mut session);
        assert_eq!(
            directory.current_session(&session),
            Err(DomainError::NoActiveSession)
        );
    }

    #[test]
    fn sessions_are_independent() {
        let directory = directory();
        let mut alice_session = Session::new();
        let mut admin_session = Session::new();
        let alice = directory
            .register(&mut alice_session, "Alice", "alice@example.com", "pw")
            .unwrap();
        let admin = directory
            .register(&mut admin_session, "Admin", "admin@x.io", "pw")
            .unwrap();

        directory.sign_out(&mut admin_session);

        assert_eq!(directory.current_session(&alice_session).unwrap(), alice);
        assert!(directory.is_administrator(&admin));
        assert!(!directory.is_administrator(&alice));
        assert_eq!(directory.role_of(&admin), Role::Administrator);
    }

    #[test]
    fn get_unknown_account_fails() {
        let directory = directory();
        let id = AccountId::new();
        assert_eq!(directory.get(id), Err(DomainError::AccountNotFound(id)));
    }

    #[test]
    fn search_matches_name_or_email_case_insensitively() {
        let directory = directory();
        let mut session = Session::new();
        let john = directory
            .register(&mut session, "John Doe", "john@example.com", "pw")
            .unwrap();
        let jane = directory
            .register(&mut session, "Jane Roe", "jane@tea.shop", "pw")
            .unwrap();

        assert_eq!(directory.search("DOE"), vec![john.clone()]);
        assert_eq!(directory.search("tea.shop"), vec![jane.clone()]);
        assert_eq!(directory.search("   "), vec![john, jane]);
        assert!(directory.search("zzz").is_empty());
    }
}
