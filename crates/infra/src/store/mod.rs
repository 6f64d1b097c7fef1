//! Storage backends for the domain `KeyValueStore` and `EventLog` abstractions.

pub mod event_log;
pub mod in_memory;

pub use event_log::InMemoryEventLog;
pub use in_memory::InMemoryStore;
