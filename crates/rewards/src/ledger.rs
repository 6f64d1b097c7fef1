//! The rewards ledger: one punch card per account, persisted by key.
//!
//! The ledger does not check who is calling. Gating `adjust`/`reset` behind
//! the administrator role is the job of the caller.
//!
//! Current cards and their history live in separate stores, so reading a
//! count never touches the history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use punchcard_core::{
    AccountId, Aggregate, AggregateRoot, DomainResult, Event, EventLog, KeyValueStore,
};

use crate::card::{
    AdjustPunches, AdminAction, Direction, EarnPunch, PunchCard, PunchCardCommand, PunchCardEvent,
    Redeem, ResetCard,
};

/// What callers see of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsLedgerEntry {
    pub account_id: AccountId,
    pub punch_count: u8,
    pub last_updated: Option<DateTime<Utc>>,
    pub version: u64,
}

impl From<&PunchCard> for RewardsLedgerEntry {
    fn from(card: &PunchCard) -> Self {
        Self {
            account_id: card.account_id(),
            punch_count: card.punches().get(),
            last_updated: card.last_updated(),
            version: card.version(),
        }
    }
}

pub struct RewardsLedger<S, H> {
    cards: S,
    history: H,
}

impl<S, H> RewardsLedger<S, H>
where
    S: KeyValueStore<AccountId, PunchCard>,
    H: EventLog<AccountId, PunchCardEvent>,
{
    pub fn new(cards: S, history: H) -> Self {
        Self { cards, history }
    }

    /// Current entry, creating an empty card on first access.
    pub fn get(&self, account_id: AccountId) -> RewardsLedgerEntry {
        match self.cards.get(&account_id) {
            Some(card) => RewardsLedgerEntry::from(&card),
            None => {
                let card = PunchCard::new(account_id);
                let entry = RewardsLedgerEntry::from(&card);
                self.cards.put(account_id, card);
                tracing::debug!(%account_id, "punch card created");
                entry
            }
        }
    }

    /// `n -> min(n + 1, 9)`. A full card is returned unchanged.
    pub fn earn_punch(&self, account_id: AccountId) -> DomainResult<RewardsLedgerEntry> {
        self.execute(&PunchCardCommand::EarnPunch(EarnPunch {
            account_id,
            occurred_at: Utc::now(),
        }))
    }

    /// `9 -> 0`; fails with `InsufficientPunches` below a full card.
    pub fn redeem(&self, account_id: AccountId) -> DomainResult<RewardsLedgerEntry> {
        let entry = self
            .execute(&PunchCardCommand::Redeem(Redeem {
                account_id,
                occurred_at: Utc::now(),
            }))
            .inspect_err(|e| {
                tracing::debug!(%account_id, error = %e, "redeem refused");
            })?;
        tracing::info!(%account_id, "reward redeemed");
        Ok(entry)
    }

    /// Administrative +1/-1, clamped silently at the boundaries.
    pub fn adjust(
        &self,
        account_id: AccountId,
        direction: Direction,
    ) -> DomainResult<RewardsLedgerEntry> {
        self.execute(&PunchCardCommand::AdjustPunches(AdjustPunches {
            account_id,
            direction,
            occurred_at: Utc::now(),
        }))
    }

    /// Administrative reset to zero, whatever the current count.
    pub fn reset(&self, account_id: AccountId) -> DomainResult<RewardsLedgerEntry> {
        let entry = self.execute(&PunchCardCommand::ResetCard(ResetCard {
            account_id,
            occurred_at: Utc::now(),
        }))?;
        tracing::info!(%account_id, "punch card reset");
        Ok(entry)
    }

    pub fn apply_admin_action(
        &self,
        account_id: AccountId,
        action: AdminAction,
    ) -> DomainResult<RewardsLedgerEntry> {
        self.execute(&PunchCardCommand::from_admin_action(
            account_id,
            action,
            Utc::now(),
        ))
    }

    /// Run a card command through the aggregate and persist the outcome.
    ///
    /// A refused command leaves both stores untouched.
    pub fn execute(&self, command: &PunchCardCommand) -> DomainResult<RewardsLedgerEntry> {
        let account_id = command.account_id();
        let mut card = self
            .cards
            .get(&account_id)
            .unwrap_or_else(|| PunchCard::new(account_id));

        let events = card.execute(command)?;
        if events.is_empty() {
            tracing::debug!(%account_id, punches = %card.punches(), "no change at boundary");
        }
        for event in &events {
            tracing::debug!(
                %account_id,
                event_type = event.event_type(),
                punches = %card.punches(),
                "punch card updated"
            );
        }

        let entry = RewardsLedgerEntry::from(&card);
        self.cards.put(account_id, card);
        self.history.append(account_id, events);
        Ok(entry)
    }

    /// Applied transitions for the account, oldest first.
    pub fn history(&self, account_id: AccountId) -> Vec<PunchCardEvent> {
        self.history.read(&account_id)
    }
}
