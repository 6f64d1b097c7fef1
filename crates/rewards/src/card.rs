use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use punchcard_core::{AccountId, Aggregate, AggregateRoot, DomainError, DomainResult, Event};

/// Punches needed for a free reward.
pub const MAX_PUNCHES: u8 = 9;

// ─────────────────────────────────────────────────────────────────────────────
// Punch Count
// ─────────────────────────────────────────────────────────────────────────────

/// Number of punches on a card, always within `0..=MAX_PUNCHES`.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct PunchCount(u8);

impl PunchCount {
    pub const EMPTY: PunchCount = PunchCount(0);
    pub const FULL: PunchCount = PunchCount(MAX_PUNCHES);

    pub fn new(value: u8) -> DomainResult<Self> {
        if value > MAX_PUNCHES {
            return Err(DomainError::validation(format!(
                "punch count {value} exceeds {MAX_PUNCHES}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_full(self) -> bool {
        self == Self::FULL
    }

    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    fn incremented(self) -> Self {
        Self((self.0 + 1).min(MAX_PUNCHES))
    }

    fn decremented(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl TryFrom<u8> for PunchCount {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PunchCount> for u8 {
    fn from(value: PunchCount) -> Self {
        value.0
    }
}

impl core::fmt::Display for PunchCount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_PUNCHES)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Administrative Actions
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increment,
    Decrement,
}

/// A privileged ledger mutation, as issued from the admin dashboard.
///
/// Parses from `add`, `remove` and `reset` (trimmed, case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Adjust(Direction),
    Reset,
}

impl AdminAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminAction::Adjust(Direction::Increment) => "add",
            AdminAction::Adjust(Direction::Decrement) => "remove",
            AdminAction::Reset => "reset",
        }
    }
}

impl FromStr for AdminAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" => Ok(AdminAction::Adjust(Direction::Increment)),
            "remove" => Ok(AdminAction::Adjust(Direction::Decrement)),
            "reset" => Ok(AdminAction::Reset),
            _ => Err(DomainError::invalid_action(s)),
        }
    }
}

impl core::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Punch Card Aggregate
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate root: one punch card per account.
///
/// # Invariants
/// - `0 <= punches <= MAX_PUNCHES` after every transition.
/// - Earning and administrative adjustments clamp at the boundaries and emit
///   nothing there; redeeming below a full card is an error.
/// - Reset always emits, whatever the current count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchCard {
    account_id: AccountId,
    punches: PunchCount,
    last_updated: Option<DateTime<Utc>>,
    version: u64,
}

impl PunchCard {
    /// A fresh, empty card.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            punches: PunchCount::EMPTY,
            last_updated: None,
            version: 0,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn punches(&self) -> PunchCount {
        self.punches
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    fn ensure_account(&self, account_id: AccountId) -> DomainResult<()> {
        if self.account_id != account_id {
            return Err(DomainError::validation("account_id mismatch"));
        }
        Ok(())
    }

    fn handle_earn(&self, cmd: &EarnPunch) -> Vec<PunchCardEvent> {
        if self.punches.is_full() {
            return vec![];
        }
        vec![PunchCardEvent::PunchEarned(PunchEarned {
            account_id: self.account_id,
            punches: self.punches.incremented(),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_redeem(&self, cmd: &Redeem) -> DomainResult<Vec<PunchCardEvent>> {
        if !self.punches.is_full() {
            return Err(DomainError::InsufficientPunches {
                have: self.punches.get(),
                need: MAX_PUNCHES,
            });
        }
        Ok(vec![PunchCardEvent::RewardRedeemed(RewardRedeemed {
            account_id: self.account_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustPunches) -> Vec<PunchCardEvent> {
        let punches = match cmd.direction {
            Direction::Increment => self.punches.incremented(),
            Direction::Decrement => self.punches.decremented(),
        };
        if punches == self.punches {
            return vec![];
        }
        vec![PunchCardEvent::PunchesAdjusted(PunchesAdjusted {
            account_id: self.account_id,
            direction: cmd.direction,
            punches,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_reset(&self, cmd: &ResetCard) -> Vec<PunchCardEvent> {
        vec![PunchCardEvent::CardReset(CardReset {
            account_id: self.account_id,
            previous: self.punches,
            occurred_at: cmd.occurred_at,
        })]
    }
}

impl AggregateRoot for PunchCard {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.account_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: add one punch (self-service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnPunch {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: trade a full card for a reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redeem {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: administrative +1/-1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustPunches {
    pub account_id: AccountId,
    pub direction: Direction,
    pub occurred_at: DateTime<Utc>,
}

/// Command: administrative reset to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetCard {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PunchCardCommand {
    EarnPunch(EarnPunch),
    Redeem(Redeem),
    AdjustPunches(AdjustPunches),
    ResetCard(ResetCard),
}

impl PunchCardCommand {
    pub fn account_id(&self) -> AccountId {
        match self {
            PunchCardCommand::EarnPunch(c) => c.account_id,
            PunchCardCommand::Redeem(c) => c.account_id,
            PunchCardCommand::AdjustPunches(c) => c.account_id,
            PunchCardCommand::ResetCard(c) => c.account_id,
        }
    }

    /// The command equivalent of an admin dashboard action.
    pub fn from_admin_action(
        account_id: AccountId,
        action: AdminAction,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        match action {
            AdminAction::Adjust(direction) => PunchCardCommand::AdjustPunches(AdjustPunches {
                account_id,
                direction,
                occurred_at,
            }),
            AdminAction::Reset => PunchCardCommand::ResetCard(ResetCard {
                account_id,
                occurred_at,
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// Event: a punch was earned; `punches` is the resulting count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchEarned {
    pub account_id: AccountId,
    pub punches: PunchCount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a full card was redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRedeemed {
    pub account_id: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an administrator moved the count by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchesAdjusted {
    pub account_id: AccountId,
    pub direction: Direction,
    pub punches: PunchCount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an administrator reset the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardReset {
    pub account_id: AccountId,
    pub previous: PunchCount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PunchCardEvent {
    PunchEarned(PunchEarned),
    RewardRedeemed(RewardRedeemed),
    PunchesAdjusted(PunchesAdjusted),
    CardReset(CardReset),
}

impl Event for PunchCardEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PunchCardEvent::PunchEarned(_) => "rewards.card.punch_earned",
            PunchCardEvent::RewardRedeemed(_) => "rewards.card.redeemed",
            PunchCardEvent::PunchesAdjusted(_) => "rewards.card.adjusted",
            PunchCardEvent::CardReset(_) => "rewards.card.reset",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PunchCardEvent::PunchEarned(e) => e.occurred_at,
            PunchCardEvent::RewardRedeemed(e) => e.occurred_at,
            PunchCardEvent::PunchesAdjusted(e) => e.occurred_at,
            PunchCardEvent::CardReset(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate Implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for PunchCard {
    type Command = PunchCardCommand;
    type Event = PunchCardEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PunchCardEvent::PunchEarned(e) => self.punches = e.punches,
            PunchCardEvent::RewardRedeemed(_) => self.punches = PunchCount::EMPTY,
            PunchCardEvent::PunchesAdjusted(e) => self.punches = e.punches,
            PunchCardEvent::CardReset(_) => self.punches = PunchCount::EMPTY,
        }
        self.last_updated = Some(event.occurred_at());
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_account(command.account_id())?;

        match command {
            PunchCardCommand::EarnPunch(cmd) => Ok(self.handle_earn(cmd)),
            PunchCardCommand::Redeem(cmd) => self.handle_redeem(cmd),
            PunchCardCommand::AdjustPunches(cmd) => Ok(self.handle_adjust(cmd)),
            PunchCardCommand::ResetCard(cmd) => Ok(self.handle_reset(cmd)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn earn(id: AccountId) -> PunchCardCommand {
        PunchCardCommand::EarnPunch(EarnPunch {
            account_id: id,
            occurred_at: Utc::now(),
        })
    }

    fn redeem(id: AccountId) -> PunchCardCommand {
        PunchCardCommand::Redeem(Redeem {
            account_id: id,
            occurred_at: Utc::now(),
        })
    }

    fn adjust(id: AccountId, direction: Direction) -> PunchCardCommand {
        PunchCardCommand::AdjustPunches(AdjustPunches {
            account_id: id,
            direction,
            occurred_at: Utc::now(),
        })
    }

    fn reset(id: AccountId) -> PunchCardCommand {
        PunchCardCommand::ResetCard(ResetCard {
            account_id: id,
            occurred_at: Utc::now(),
        })
    }

    fn card_with(punches: u8) -> PunchCard {
        let id = AccountId::new();
        let mut card = PunchCard::new(id);
        for _ in 0..punches {
            card.execute(&earn(id)).unwrap();
        }
        card
    }

    #[test]
    fn nine_earns_fill_the_card_and_tenth_is_noop() {
        let mut card = card_with(9);
        assert!(card.punches().is_full());
        assert_eq!(card.version(), 9);

        let events = card.execute(&earn(card.account_id())).unwrap();
        assert!(events.is_empty());
        assert_eq!(card.punches().get(), 9);
        assert_eq!(card.version(), 9);
    }

    #[test]
    fn redeem_full_card_empties_it() {
        let mut card = card_with(9);
        let events = card.execute(&redeem(card.account_id())).unwrap();

        assert!(matches!(events[..], [PunchCardEvent::RewardRedeemed(_)]));
        assert!(card.punches().is_empty());
    }

    #[test]
    fn redeem_below_full_fails_without_change() {
        for n in 0..MAX_PUNCHES {
            let mut card = card_with(n);
            let before = card.clone();

            let err = card.execute(&redeem(card.account_id())).unwrap_err();

            assert_eq!(err, DomainError::InsufficientPunches { have: n, need: 9 });
            assert_eq!(card, before);
        }
    }

    #[test]
    fn decrement_at_zero_is_silent_noop() {
        let mut card = card_with(0);
        let events = card
            .execute(&adjust(card.account_id(), Direction::Decrement))
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(card.punches().get(), 0);
        assert_eq!(card.last_updated(), None);
    }

    #[test]
    fn increment_at_nine_is_silent_noop() {
        let mut card = card_with(9);
        let events = card
            .execute(&adjust(card.account_id(), Direction::Increment))
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(card.punches().get(), 9);
    }

    #[test]
    fn adjust_moves_by_one() {
        let mut card = card_with(4);
        card.execute(&adjust(card.account_id(), Direction::Increment))
            .unwrap();
        assert_eq!(card.punches().get(), 5);
        card.execute(&adjust(card.account_id(), Direction::Decrement))
            .unwrap();
        card.execute(&adjust(card.account_id(), Direction::Decrement))
            .unwrap();
        assert_eq!(card.punches().get(), 3);
    }

    #[test]
    fn reset_from_any_value_yields_zero() {
        for n in 0..=MAX_PUNCHES {
            let mut card = card_with(n);
            let events = card.execute(&reset(card.account_id())).unwrap();
            let [PunchCardEvent::CardReset(e)] = &events[..] else {
                panic!("expected CardReset event");
            };
            assert_eq!(e.previous.get(), n);
            assert!(card.punches().is_empty());
        }
    }

    #[test]
    fn command_for_another_account_is_rejected() {
        let card = card_with(2);
        let result = card.handle(&earn(AccountId::new()));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn handle_does_not_mutate() {
        let card = card_with(3);
        let before = card.clone();
        let _ = card.handle(&earn(card.account_id())).unwrap();
        assert_eq!(card, before);
    }

    #[test]
    fn admin_action_parsing() {
        assert_eq!(
            "add".parse::<AdminAction>().unwrap(),
            AdminAction::Adjust(Direction::Increment)
        );
        assert_eq!(
            " Remove ".parse::<AdminAction>().unwrap(),
            AdminAction::Adjust(Direction::Decrement)
        );
        assert_eq!("RESET".parse::<AdminAction>().unwrap(), AdminAction::Reset);
        assert_eq!(
            "double".parse::<AdminAction>().unwrap_err(),
            DomainError::InvalidAction("double".to_string())
        );
        assert_eq!(AdminAction::Reset.to_string(), "reset");
    }

    #[test]
    fn punch_count_rejects_out_of_range() {
        assert!(PunchCount::new(9).is_ok());
        assert!(matches!(PunchCount::new(10), Err(DomainError::Validation(_))));
        assert!(serde_json::from_str::<PunchCount>("12").is_err());
        assert_eq!(serde_json::from_str::<PunchCount>("7").unwrap().get(), 7);
    }

    #[test]
    fn events_carry_type_tag() {
        let card = card_with(0);
        let events = card.handle(&earn(card.account_id())).unwrap();
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "punch_earned");
        assert_eq!(json["punches"], 1);
        assert_eq!(events[0].event_type(), "rewards.card.punch_earned");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_command(id: AccountId) -> impl Strategy<Value = PunchCardCommand> {
            prop_oneof![
                Just(earn(id)),
                Just(redeem(id)),
                Just(adjust(id, Direction::Increment)),
                Just(adjust(id, Direction::Decrement)),
                Just(reset(id)),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the count stays within bounds after any sequence.
            #[test]
            fn punches_stay_in_range(
                commands in prop::collection::vec(any_command(AccountId::from_uuid(uuid_fixture())), 0..64)
            ) {
                let mut card = PunchCard::new(AccountId::from_uuid(uuid_fixture()));
                for command in &commands {
                    let before = card.clone();
                    match card.execute(command) {
                        Ok(_) => {}
                        Err(DomainError::InsufficientPunches { .. }) => {
                            prop_assert_eq!(&card, &before);
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {other}"),
                    }
                    prop_assert!(card.punches().get() <= MAX_PUNCHES);
                }
            }

            /// Property: version counts exactly the emitted events.
            #[test]
            fn version_tracks_emitted_events(
                commands in prop::collection::vec(any_command(AccountId::from_uuid(uuid_fixture())), 0..64)
            ) {
                let mut card = PunchCard::new(AccountId::from_uuid(uuid_fixture()));
                let mut emitted = 0u64;
                for command in &commands {
                    if let Ok(events) = card.execute(command) {
                        emitted += events.len() as u64;
                    }
                }
                prop_assert_eq!(card.version(), emitted);
            }
        }

        fn uuid_fixture() -> uuid::Uuid {
            uuid::Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001)
        }
    }
}
