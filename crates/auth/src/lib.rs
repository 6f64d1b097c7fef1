//! `punchcard-auth` — the account directory and the administrator role.
//!
//! This crate is decoupled from storage (any `KeyValueStore`) and from the
//! presentation layer. Sessions are plain values owned by the caller.

pub mod account;
pub mod directory;
pub mod policy;
pub mod roles;
pub mod session;

pub use account::{Account, AccountRecord, PasswordSecret};
pub use directory::AccountDirectory;
pub use policy::AdminAllowlist;
pub use roles::Role;
pub use session::Session;
