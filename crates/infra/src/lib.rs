//! Infrastructure layer: storage backends and configuration.

pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use store::{InMemoryEventLog, InMemoryStore};
