use std::collections::BTreeMap;
use std::sync::RwLock;

use punchcard_core::KeyValueStore;

/// In-memory key/value store for tests/dev and the demo binary.
///
/// Backed by a `BTreeMap` so `list` is ordered by key. Lock poisoning is
/// treated as an empty store on reads and a dropped write, matching the
/// no-durability contract of this backend.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<BTreeMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn put(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use punchcard_core::AccountId;
    use std::sync::Arc;

    #[test]
    fn get_returns_none_for_missing_key() {
        let store: InMemoryStore<AccountId, u8> = InMemoryStore::new();
        assert!(store.get(&AccountId::new()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn put_overwrites_existing_value() {
        let store = InMemoryStore::new();
        let id = AccountId::new();
        store.put(id, 3u8);
        store.put(id, 7u8);
        assert_eq!(store.get(&id), Some(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_is_ordered_by_key() {
        let store = InMemoryStore::new();
        let first = AccountId::new();
        let second = AccountId::new();
        store.put(second, "second");
        store.put(first, "first");
        assert_eq!(store.list(), vec!["first", "second"]);
    }

    #[test]
    fn shared_through_arc() {
        let store: Arc<InMemoryStore<AccountId, u8>> = Arc::new(InMemoryStore::new());
        let id = AccountId::new();
        let writer = Arc::clone(&store);
        writer.put(id, 1u8);
        assert_eq!(KeyValueStore::get(&store, &id), Some(1));
    }
}
