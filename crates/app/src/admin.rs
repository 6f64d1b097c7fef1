//! Admin dashboard operations.
//!
//! The ledger itself trusts its callers; this console is where the
//! administrator role is enforced before any privileged mutation.

use serde::Serialize;

use punchcard_auth::{Account, AccountRecord, Role, Session};
use punchcard_core::{AccountId, DomainResult, EventLog, KeyValueStore};
use punchcard_rewards::{AdminAction, Direction, PunchCard, PunchCardEvent, RewardsLedgerEntry};

use crate::service::LoyaltyService;

/// One row of the admin dashboard. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRewards {
    #[serde(flatten)]
    pub account: Account,
    pub role: Role,
    pub punches: u8,
}

pub struct AdminConsole<'a, D, L, H> {
    service: &'a LoyaltyService<D, L, H>,
}

impl<'a, D, L, H> AdminConsole<'a, D, L, H>
where
    D: KeyValueStore<AccountId, AccountRecord>,
    L: KeyValueStore<AccountId, PunchCard>,
    H: EventLog<AccountId, PunchCardEvent>,
{
    pub(crate) fn new(service: &'a LoyaltyService<D, L, H>) -> Self {
        Self { service }
    }

    /// Every account with its current punch count.
    pub async fn dashboard(&self, session: &Session) -> DomainResult<Vec<MemberRewards>> {
        self.authorize(session).await?;
        let accounts = self.service.directory().list();
        Ok(self.rows(accounts))
    }

    /// Dashboard rows whose name or email contains `query`.
    pub async fn search(&self, session: &Session, query: &str) -> DomainResult<Vec<MemberRewards>> {
        self.authorize(session).await?;
        let accounts = self.service.directory().search(query);
        Ok(self.rows(accounts))
    }

    /// Apply a named dashboard action (`add`, `remove`, `reset`).
    pub async fn update_rewards(
        &self,
        session: &Session,
        account_id: AccountId,
        action: &str,
    ) -> DomainResult<RewardsLedgerEntry> {
        let admin = self.authorize(session).await?;
        let action: AdminAction = action.parse()?;
        self.apply(&admin, account_id, action)
    }

    pub async fn add_punch(
        &self,
        session: &Session,
        account_id: AccountId,
    ) -> DomainResult<RewardsLedgerEntry> {
        let admin = self.authorize(session).await?;
        self.apply(&admin, account_id, AdminAction::Adjust(Direction::Increment))
    }

    pub async fn remove_punch(
        &self,
        session: &Session,
        account_id: AccountId,
    ) -> DomainResult<RewardsLedgerEntry> {
        let admin = self.authorize(session).await?;
        self.apply(&admin, account_id, AdminAction::Adjust(Direction::Decrement))
    }

    /// Reset a card to zero. Asking the operator to confirm is up to the UI.
    pub async fn reset(
        &self,
        session: &Session,
        account_id: AccountId,
    ) -> DomainResult<RewardsLedgerEntry> {
        let admin = self.authorize(session).await?;
        self.apply(&admin, account_id, AdminAction::Reset)
    }

    async fn authorize(&self, session: &Session) -> DomainResult<Account> {
        let account = self.service.current_account(session).await?;
        self.service
            .directory()
            .allowlist()
            .authorize(&account)
            .inspect_err(|_| {
                tracing::warn!(account_id = %account.id, "admin access denied");
            })?;
        Ok(account)
    }

    fn apply(
        &self,
        admin: &Account,
        account_id: AccountId,
        action: AdminAction,
    ) -> DomainResult<RewardsLedgerEntry> {
        let target = self.service.directory().get(account_id)?;
        let entry = self.service.ledger().apply_admin_action(target.id, action)?;
        tracing::info!(
            admin_id = %admin.id,
            account_id = %target.id,
            action = %action,
            punches = entry.punch_count,
            "admin updated rewards"
        );
        Ok(entry)
    }

    fn rows(&self, accounts: Vec<Account>) -> Vec<MemberRewards> {
        let directory = self.service.directory();
        accounts
            .into_iter()
            .map(|account| MemberRewards {
                role: directory.role_of(&account),
                punches: self.service.ledger().get(account.id).punch_count,
                account,
            })
            .collect()
    }
}
