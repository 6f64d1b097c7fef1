//! Rewards domain module: the punch-card state machine and its ledger.
//!
//! Business rules live in [`card`] as deterministic aggregate logic (no IO);
//! [`ledger`] persists cards through any `KeyValueStore` and their history
//! through any `EventLog`.

pub mod card;
pub mod ledger;

pub use card::{
    AdjustPunches, AdminAction, CardReset, Direction, EarnPunch, MAX_PUNCHES, PunchCard,
    PunchCardCommand, PunchCardEvent, PunchCount, PunchEarned, PunchesAdjusted, Redeem,
    ResetCard, RewardRedeemed,
};
pub use ledger::{RewardsLedger, RewardsLedgerEntry};
