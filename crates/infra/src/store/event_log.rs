use std::collections::BTreeMap;
use std::sync::RwLock;

use punchcard_core::EventLog;

/// In-memory append-only event log, one stream per key.
///
/// Intended for tests/dev and the demo binary. A poisoned lock reads as an
/// empty stream and drops the append.
#[derive(Debug)]
pub struct InMemoryEventLog<K, E> {
    streams: RwLock<BTreeMap<K, Vec<E>>>,
}

impl<K, E> InMemoryEventLog<K, E> {
    pub fn new() -> Self {
        Self {
            streams: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys with at least one event.
    pub fn stream_count(&self) -> usize {
        self.streams.read().map(|s| s.len()).unwrap_or(0)
    }
}

impl<K, E> Default for InMemoryEventLog<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> EventLog<K, E> for InMemoryEventLog<K, E>
where
    K: Ord + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn append(&self, key: K, events: Vec<E>) {
        if events.is_empty() {
            return;
        }
        if let Ok(mut streams) = self.streams.write() {
            streams.entry(key).or_default().extend(events);
        }
    }

    fn read(&self, key: &K) -> Vec<E> {
        match self.streams.read() {
            Ok(streams) => streams.get(key).cloned().unwrap_or_default(),
            Err(_) => vec![],
        }
    }
}
