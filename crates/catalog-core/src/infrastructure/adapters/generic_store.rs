//! Concurrent key-value map backing the in-memory adapters

use dashmap::DashMap;
use std::{hash::Hash, sync::Arc};

/// Thread-safe in-memory map.
///
/// Clones share the same underlying `DashMap`, so a store handed to several
/// sessions is one logical database.
#[derive(Debug)]
pub struct InMemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    data: Arc<DashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.data.get(key).map(|entry| entry.value().clone())
    }

    /// Insert or replace, returning the previous value
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.data.insert(key, value)
    }

    /// Replace an existing value; returns `false` and stores nothing when absent
    pub fn replace(&self, key: &K, value: V) -> bool {
        match self.data.get_mut(key) {
            Some(mut entry) => {
                *entry = value;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.data.remove(key).map(|(_k, v)| v)
    }

    /// Clone every value matching `predicate`
    pub fn filter<P>(&self, predicate: P) -> Vec<V>
    where
        P: Fn(&V) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K, V> Default for InMemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for InMemoryStore<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let store: InMemoryStore<u32, &'static str> = InMemoryStore::new();
        assert!(store.is_empty());

        assert_eq!(store.insert(1, "lamp"), None);
        assert_eq!(store.insert(1, "desk lamp"), Some("lamp"));
        assert_eq!(store.get(&1), Some("desk lamp"));
        assert_eq!(store.count(), 1);

        assert_eq!(store.remove(&1), Some("desk lamp"));
        assert_eq!(store.get(&1), None);
    }

    #[test]
    fn test_replace_requires_existing_key() {
        let store: InMemoryStore<u32, u32> = InMemoryStore::new();
        assert!(!store.replace(&7, 70));
        assert!(!store.contains_key(&7));

        store.insert(7, 1);
        assert!(store.replace(&7, 70));
        assert_eq!(store.get(&7), Some(70));
    }

    #[test]
    fn test_filter_and_shared_clones() {
        let first: InMemoryStore<u32, u32> = InMemoryStore::new();
        let second = first.clone();

        for n in 1..=6 {
            second.insert(n, n * 10);
        }

        let mut even = first.filter(|v| v % 20 == 0);
        even.sort_unstable();
        assert_eq!(even, vec![20, 40, 60]);
    }
}
