//! Application layer: the async call surface consumed by the presentation
//! layer, the privileged admin path, and user-facing error messages.

pub mod admin;
pub mod demo;
pub mod errors;
pub mod service;

pub use admin::{AdminConsole, MemberRewards};
pub use errors::UserFacingError;
pub use service::{InMemoryLoyaltyService, LoyaltyService};
