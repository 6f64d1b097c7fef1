//! Storage abstractions shared by the directory and the ledger.
//!
//! Domain components only ever `get`/`put`/`list` by key, so any backing
//! (in-memory map, embedded database, remote cache) can sit behind them
//! without touching business rules.

use std::sync::Arc;

/// Key/value store keyed by an identifier.
///
/// Implementations use interior mutability so a store can be shared behind
/// `Arc` by a single owning component.
pub trait KeyValueStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    /// All values, ordered by key.
    fn list(&self) -> Vec<V>;
}

impl<K, V, S> KeyValueStore<K, V> for Arc<S>
where
    S: KeyValueStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn put(&self, key: K, value: V) {
        (**self).put(key, value)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }
}

/// Append-only log of events per key.
///
/// Kept apart from the `KeyValueStore` holding current state so reading the
/// state never copies the log.
pub trait EventLog<K, E>: Send + Sync {
    fn append(&self, key: K, events: Vec<E>);
    /// Events for `key`, oldest first. Empty for unknown keys.
    fn read(&self, key: &K) -> Vec<E>;
}

impl<K, E, S> EventLog<K, E> for Arc<S>
where
    S: EventLog<K, E> + ?Sized,
{
    fn append(&self, key: K, events: Vec<E>) {
        (**self).append(key, events)
    }

    fn read(&self, key: &K) -> Vec<E> {
        (**self).read(key)
    }
}
