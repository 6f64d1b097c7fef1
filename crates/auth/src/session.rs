use punchcard_core::AccountId;

/// The active identity of one client.
///
/// A session is owned by its caller and passed to the directory; any number
/// of sessions can share one directory. `register` and `authenticate` set
/// it, `sign_out` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    account_id: Option<AccountId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.account_id
    }

    pub fn is_active(&self) -> bool {
        self.account_id.is_some()
    }

    /// Clear the active identity. Idempotent.
    pub fn sign_out(&mut self) {
        self.account_id = None;
    }

    pub(crate) fn activate(&mut self, account_id: AccountId) {
        self.account_id = Some(account_id);
    }
}
