//! Undo journal for transactional updates.
//!
//! A [`JournaledMap`] records the prior value of every key it changes while
//! a transaction is open. Committing drops the records; rolling back
//! replays them in reverse. The cost of a transaction is proportional to
//! the keys it touches, not to the size of the map.

use std::collections::HashMap;
use std::hash::Hash;

use crate::traits::Transactional;

/// A `HashMap` that can undo every change made since [`Transactional::begin`].
#[derive(Debug, Clone)]
pub struct JournaledMap<K, V> {
    entries: HashMap<K, V>,
    undo: Option<Vec<(K, Option<V>)>>,
}

impl<K, V> Default for JournaledMap<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            undo: None,
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> JournaledMap<K, V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: K, value: V) {
        let prior = self.entries.insert(key.clone(), value);
        if let Some(undo) = &mut self.undo {
            undo.push((key, prior));
        }
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let prior = self.entries.remove(key);
        if let (Some(undo), Some(value)) = (&mut self.undo, &prior) {
            undo.push((key.clone(), Some(value.clone())));
        }
        prior
    }

    /// Mutable access to a value. The current value is journaled first.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if let Some(undo) = &mut self.undo {
            if let Some(value) = self.entries.get(key) {
                undo.push((key.clone(), Some(value.clone())));
            }
        }
        self.entries.get_mut(key)
    }

    /// All values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changes recorded by the open transaction.
    pub fn journal_len(&self) -> usize {
        self.undo.as_ref().map_or(0, Vec::len)
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Transactional for JournaledMap<K, V> {
    fn begin(&mut self) {
        self.rollback();
        self.undo = Some(Vec::new());
    }

    fn commit(&mut self) {
        self.undo = None;
    }

    fn rollback(&mut self) {
        let Some(undo) = self.undo.take() else {
            return;
        };
        for (key, prior) in undo.into_iter().rev() {
            match prior {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
    }
}
