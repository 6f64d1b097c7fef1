use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are immutable facts recorded in application order; the rewards
/// ledger keeps them as the per-account activity history.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "rewards.card.punch_earned").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}
