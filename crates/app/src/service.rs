//! Async facade over the account directory and the rewards ledger.
//!
//! Every call first awaits the configured simulated latency, so a client
//! can be built against the same loading-state contract as a remote backend.

use std::sync::Arc;
use std::time::Duration;

use punchcard_auth::{Account, AccountDirectory, AccountRecord, AdminAllowlist, Session};
use punchcard_core::{AccountId, DomainResult, EventLog, KeyValueStore};
use punchcard_infra::{AppConfig, InMemoryEventLog, InMemoryStore};
use punchcard_rewards::{PunchCard, PunchCardEvent, RewardsLedger, RewardsLedgerEntry};

use crate::admin::AdminConsole;

pub type InMemoryLoyaltyService = LoyaltyService<
    Arc<InMemoryStore<AccountId, AccountRecord>>,
    Arc<InMemoryStore<AccountId, PunchCard>>,
    Arc<InMemoryEventLog<AccountId, PunchCardEvent>>,
>;

pub struct LoyaltyService<D, L, H> {
    directory: AccountDirectory<D>,
    ledger: RewardsLedger<L, H>,
    latency: Duration,
}

impl InMemoryLoyaltyService {
    /// Service backed by fresh in-memory stores.
    pub fn in_memory(config: &AppConfig) -> Self {
        let allowlist = AdminAllowlist::new(config.admin_emails.iter().cloned());
        Self::new(
            AccountDirectory::new(Arc::new(InMemoryStore::new()), allowlist),
            RewardsLedger::new(
                Arc::new(InMemoryStore::new()),
                Arc::new(InMemoryEventLog::new()),
            ),
            config.simulated_latency,
        )
    }
}

impl<D, L, H> LoyaltyService<D, L, H>
where
    D: KeyValueStore<AccountId, AccountRecord>,
    L: KeyValueStore<AccountId, PunchCard>,
    H: EventLog<AccountId, PunchCardEvent>,
{
    pub fn new(
        directory: AccountDirectory<D>,
        ledger: RewardsLedger<L, H>,
        latency: Duration,
    ) -> Self {
        Self {
            directory,
            ledger,
            latency,
        }
    }

    pub fn directory(&self) -> &AccountDirectory<D> {
        &self.directory
    }

    pub fn ledger(&self) -> &RewardsLedger<L, H> {
        &self.ledger
    }

    /// The privileged path; every call on it checks the administrator role.
    pub fn admin(&self) -> AdminConsole<'_, D, L, H> {
        AdminConsole::new(self)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Account
    // ─────────────────────────────────────────────────────────────────────

    pub async fn register(
        &self,
        session: &mut Session,
        name: &str,
        email: &str,
        secret: &str,
    ) -> DomainResult<Account> {
        self.round_trip().await;
        self.directory.register(session, name, email, secret)
    }

    pub async fn sign_in(
        &self,
        session: &mut Session,
        email: &str,
        secret: &str,
    ) -> DomainResult<Account> {
        self.round_trip().await;
        self.directory.authenticate(session, email, secret)
    }

    pub async fn current_account(&self, session: &Session) -> DomainResult<Account> {
        self.round_trip().await;
        self.directory.current_session(session)
    }

    pub async fn sign_out(&self, session: &mut Session) {
        self.directory.sign_out(session);
    }

    /// Whether the signed-in account may open the admin dashboard.
    pub async fn is_administrator(&self, session: &Session) -> DomainResult<bool> {
        let account = self.current_account(session).await?;
        Ok(self.directory.is_administrator(&account))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Self-service rewards
    // ─────────────────────────────────────────────────────────────────────

    pub async fn my_rewards(&self, session: &Session) -> DomainResult<RewardsLedgerEntry> {
        let account = self.current_account(session).await?;
        Ok(self.ledger.get(account.id))
    }

    pub async fn earn_punch(&self, session: &Session) -> DomainResult<RewardsLedgerEntry> {
        let account = self.current_account(session).await?;
        self.ledger.earn_punch(account.id)
    }

    pub async fn redeem(&self, session: &Session) -> DomainResult<RewardsLedgerEntry> {
        let account = self.current_account(session).await?;
        self.ledger.redeem(account.id)
    }

    pub async fn my_history(&self, session: &Session) -> DomainResult<Vec<PunchCardEvent>> {
        let account = self.current_account(session).await?;
        Ok(self.ledger.history(account.id))
    }

    pub(crate) async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
