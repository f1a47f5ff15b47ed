//! A map plus an ordered key sequence.
//!
//! Every list-like pane renders one of these. The sequence may repeat a key
//! (a song queued twice, the same track twice in a stored playlist) while the
//! map holds a single value per distinct key. A map entry lives exactly as
//! long as at least one occurrence of its key remains in the sequence.

use std::collections::HashMap;
use std::hash::Hash;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyedListError {
    #[error("no entry for that key or index")]
    NotFound,
    #[error("key already present")]
    DuplicateKey,
}

#[derive(Debug, Clone)]
pub struct KeyedList<K, V> {
    map: HashMap<K, V>,
    order: Vec<K>,
    sorted: bool,
}

impl<K, V> Default for KeyedList<K, V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            order: Vec::new(),
            sorted: false,
        }
    }
}

impl<K, V> KeyedList<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that keeps its sequence ordered by key on every insert.
    pub fn sorted() -> Self {
        Self {
            sorted: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Result<&V, KeyedListError> {
        self.map.get(key).ok_or(KeyedListError::NotFound)
    }

    pub fn get_at(&self, index: usize) -> Result<&V, KeyedListError> {
        let key = self.key_at(index)?;
        self.get(key)
    }

    pub fn key_at(&self, index: usize) -> Result<&K, KeyedListError> {
        self.order.get(index).ok_or(KeyedListError::NotFound)
    }

    /// Insert or overwrite. A repeated key adds another occurrence to the
    /// sequence and replaces the shared value.
    pub fn insert(&mut self, key: K, value: V) {
        self.place(key.clone());
        self.map.insert(key, value);
    }

    pub fn insert_unique(&mut self, key: K, value: V) -> Result<(), KeyedListError> {
        if self.map.contains_key(&key) {
            return Err(KeyedListError::DuplicateKey);
        }
        self.insert(key, value);
        Ok(())
    }

    /// Remove the occurrence at `index`, returning its key.
    pub fn remove_at(&mut self, index: usize) -> Result<K, KeyedListError> {
        if index >= self.order.len() {
            return Err(KeyedListError::NotFound);
        }
        let key = self.order.remove(index);
        if !self.order.contains(&key) {
            self.map.remove(&key);
        }
        Ok(key)
    }

    /// Remove the first occurrence of `key`.
    pub fn remove(&mut self, key: &K) -> Result<(), KeyedListError> {
        let index = self
            .order
            .iter()
            .position(|k| k == key)
            .ok_or(KeyedListError::NotFound)?;
        self.remove_at(index).map(|_| ())
    }

    /// Map union plus sequence concatenation. Values from `other` win on
    /// shared keys; a sorted list keeps every merged key in order.
    pub fn merge(&mut self, other: KeyedList<K, V>) {
        let KeyedList { mut map, order, .. } = other;
        for key in order {
            self.place(key.clone());
            if let Some(value) = map.remove(&key) {
                self.map.insert(key, value);
            }
        }
    }

    /// `(key, value)` pairs in sequence order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            index: 0,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    fn place(&mut self, key: K) {
        if self.sorted {
            let at = self.order.partition_point(|k| k <= &key);
            self.order.insert(at, key);
        } else {
            self.order.push(key);
        }
    }
}

pub struct Iter<'a, K, V> {
    list: &'a KeyedList<K, V>,
    index: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.list.order.get(self.index)?;
        self.index += 1;
        let value = self.list.map.get(key)?;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.list.order.len().saturating_sub(self.index);
        (left, Some(left))
    }
}

impl<K: Eq + Hash, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FromIterator<(K, V)> for KeyedList<K, V>
where
    K: Eq + Hash + Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (k, v) in iter {
            list.insert(k, v);
        }
        list
    }
}
