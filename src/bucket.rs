use alloc::vec::Vec;

/// One chain of a [`ChainingHashTable`](crate::ChainingHashTable).
///
/// Entries are kept in append order. Keys within a bucket are unique; the
/// table guarantees this by scanning before every append.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Bucket<K, V> {
    /// Returns the number of entries chained in this bucket.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entry hashes to this bucket.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the chained pairs in append order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub(crate) fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        self.entries.push((key, value));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

impl<K: Eq, V> Bucket<K, V> {
    fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Returns the value chained under `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Removes `key` from the chain, preserving the order of the remaining
    /// entries.
    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        self.position(key).map(|index| self.entries.remove(index))
    }
}

/// One cell of an [`OpenAddressingHashTable`](crate::OpenAddressingHashTable).
///
/// `Deleted` is a tombstone: it holds no entry but keeps probe sequences
/// that passed through it connected until the next rehash.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<K, V> {
    /// Never written since the last rehash. Terminates lookups.
    Empty,
    /// Holds a live entry.
    Occupied(K, V),
    /// Previously held an entry that has since been removed.
    Deleted,
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    /// Returns `true` if the slot holds a live entry.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(..))
    }

    /// Returns `true` if the slot is a tombstone.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Slot::Deleted)
    }

    /// Returns the live entry, if any.
    pub fn entry(&self) -> Option<(&K, &V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    /// Converts an occupied slot into a tombstone, returning the entry it
    /// held. Empty and deleted slots are left untouched.
    pub(crate) fn bury(&mut self) -> Option<(K, V)> {
        if !self.is_occupied() {
            return None;
        }

        match core::mem::replace(self, Slot::Deleted) {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }
}
