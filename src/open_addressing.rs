use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::slice;

use crate::bucket::Slot;
use crate::config::ConfigError;
use crate::config::TableConfig;
use crate::hash_table::HashTable;
use crate::hash_table::grown_capacity;
use crate::hash_table::needs_growth;
use crate::probe::ProbeSequence;

/// Smallest slot count the double-hashing step can be computed for.
pub const MIN_CAPACITY: usize = 2;

/// A hash table that stores every entry inline in one slot array and
/// resolves collisions with double hashing.
///
/// Each key walks its own [`ProbeSequence`]. Removal leaves a tombstone
/// ([`Slot::Deleted`]) behind so that keys placed further along the same
/// sequence stay reachable; tombstones are reused by later insertions and
/// cleared wholesale by the next rehash.
///
/// Growth follows the shared policy: a new key first doubles the table if the
/// load factor has reached the threshold. Independently, if a key's probe
/// sequence offers no free slot (every visited slot is occupied), the table is
/// rehashed into double the space and the insertion is retried there.
///
/// # Performance Characteristics
///
/// - Expected O(1) operations while the load factor stays below the
///   threshold.
/// - Heavy churn accumulates tombstones, which lengthen unsuccessful lookups
///   until the next rehash.
/// - A hasher that sends every key to the same hash turns each operation into
///   a scan over up to `capacity` slots.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use twin_hash::DefaultHashBuilder;
/// use twin_hash::HashTable;
/// use twin_hash::OpenAddressingHashTable;
///
/// let mut table: OpenAddressingHashTable<u32, &str, DefaultHashBuilder> =
///     OpenAddressingHashTable::new();
/// table.insert(1, "first");
/// table.insert(17, "second");
///
/// assert!(table.remove(&1));
/// assert_eq!(table.find(&17), Some(&"second"));
/// assert!(!table.remove(&1));
/// # }
/// ```
#[derive(Clone)]
pub struct OpenAddressingHashTable<K, V, S> {
    slots: Vec<Slot<K, V>>,
    len: usize,
    tombstones: usize,
    load_factor: f64,
    hash_builder: S,
}

impl<K, V, S> Debug for OpenAddressingHashTable<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> OpenAddressingHashTable<K, V, S> {
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of tombstones left by removals since the last
    /// rehash.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the configured growth threshold.
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor
    }

    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the slot array, tombstones included.
    pub fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    /// Iterates every live entry in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    /// Removes every entry and tombstone, keeping the current capacity.
    pub fn clear(&mut self) {
        self.slots.fill_with(Slot::default);
        self.len = 0;
        self.tombstones = 0;
    }
}

impl<K, V, S> OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table with the default configuration and the given
    /// hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hash_builder)
    }

    /// Creates an empty table with `capacity` slots and the given hasher
    /// builder.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is below [`MIN_CAPACITY`].
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_config_and_hasher(
            TableConfig::default().with_initial_capacity(capacity),
            hash_builder,
        )
    }

    /// Creates an empty table from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is rejected by [`TableConfig::validate`] or asks
    /// for fewer than [`MIN_CAPACITY`] slots.
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        match Self::try_with_config_and_hasher(config, hash_builder) {
            Ok(table) => table,
            Err(err) => panic!("invalid table configuration: {err}"),
        }
    }

    /// Creates an empty table from `config`, rejecting invalid
    /// configurations.
    pub fn try_with_config_and_hasher(
        config: TableConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        config.validate(MIN_CAPACITY)?;

        Ok(Self {
            slots: empty_slots(config.initial_capacity),
            len: 0,
            tombstones: 0,
            load_factor: config.load_factor,
            hash_builder,
        })
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.lookup(self.hash_builder.hash_one(key), key)?;
        match &mut self.slots[index] {
            Slot::Occupied(_, value) => Some(value),
            _ => None,
        }
    }

    /// Walks the probe sequence of `key` and returns the index of its
    /// occupied slot.
    ///
    /// An empty slot ends the walk: no key is ever placed beyond the first
    /// empty slot of its sequence. Tombstones and other keys are skipped.
    fn lookup(&self, hash: u64, key: &K) -> Option<usize> {
        for index in ProbeSequence::new(hash, self.slots.len()) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(k, _) if k == key => return Some(index),
                Slot::Occupied(..) | Slot::Deleted => {}
            }
        }

        None
    }

    /// Moves `entries` into fresh storage of at least `capacity` slots.
    ///
    /// Returns the new storage and its entry count. If some entry's probe
    /// sequence finds no free slot, the attempt is abandoned and repeated at
    /// double the capacity.
    fn rebuilt(
        entries: Vec<(K, V)>,
        capacity: usize,
        hash_builder: &S,
    ) -> (Vec<Slot<K, V>>, usize) {
        let mut pending = entries;
        let mut capacity = capacity;

        loop {
            let mut slots = empty_slots(capacity);
            let mut placed = 0;
            let mut stranded = None;

            let mut rest = pending.into_iter();
            for (key, value) in rest.by_ref() {
                let hash = hash_builder.hash_one(&key);
                match place(&mut slots, hash, key, value) {
                    Ok(_) => placed += 1,
                    Err(entry) => {
                        stranded = Some(entry);
                        break;
                    }
                }
            }

            let Some(entry) = stranded else {
                return (slots, placed);
            };

            log_debug!(
                "probe sequence exhausted while rebuilding {} slots, retrying larger",
                capacity
            );
            pending = slots
                .into_iter()
                .filter_map(Slot::into_entry)
                .chain(core::iter::once(entry))
                .chain(rest)
                .collect();
            capacity = grown_capacity(capacity);
        }
    }

    /// Rehashes every live entry into double the current capacity, dropping
    /// all tombstones.
    #[cold]
    fn grow(&mut self) {
        let old_capacity = self.slots.len();
        let capacity = grown_capacity(old_capacity);
        log_debug!(
            "rehashing open-addressed table: {} -> {} slots ({} entries, {} tombstones cleared)",
            old_capacity,
            capacity,
            self.len,
            self.tombstones
        );

        let entries: Vec<(K, V)> = core::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(Slot::into_entry)
            .collect();
        let (slots, len) = Self::rebuilt(entries, capacity, &self.hash_builder);
        debug_assert_eq!(len, self.len);

        self.slots = slots;
        self.len = len;
        self.tombstones = 0;
    }
}

impl<K, V, S> OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty table with 16 slots, a 0.9 threshold and the default
    /// hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty table with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is below [`MIN_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty table from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is rejected by [`TableConfig::validate`] or asks
    /// for fewer than [`MIN_CAPACITY`] slots.
    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, S::default())
    }

    /// Creates an empty table from `config`, rejecting invalid
    /// configurations.
    pub fn try_with_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::try_with_config_and_hasher(config, S::default())
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, Slot::default);
    slots
}

/// Claims the first non-occupied slot on the probe sequence of `hash`.
///
/// Returns whether the claimed slot was a tombstone, or hands the entry back
/// if every visited slot is occupied. The caller must have ruled out that the
/// key is already present.
fn place<K, V>(
    slots: &mut [Slot<K, V>],
    hash: u64,
    key: K,
    value: V,
) -> Result<bool, (K, V)> {
    for index in ProbeSequence::new(hash, slots.len()) {
        let slot = &mut slots[index];
        if !slot.is_occupied() {
            let reused = slot.is_deleted();
            *slot = Slot::Occupied(key, value);
            return Ok(reused);
        }
    }

    Err((key, value))
}

impl<K, V, S> HashTable<K, V> for OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) {
        let hash = self.hash_builder.hash_one(&key);

        if let Some(index) = self.lookup(hash, &key) {
            if let Slot::Occupied(_, existing) = &mut self.slots[index] {
                *existing = value;
            }
            return;
        }

        if needs_growth(self.len, self.slots.len(), self.load_factor) {
            self.grow();
        }

        let mut entry = (key, value);
        loop {
            match place(&mut self.slots, hash, entry.0, entry.1) {
                Ok(reused) => {
                    self.len += 1;
                    if reused {
                        self.tombstones -= 1;
                    }
                    return;
                }
                Err(stranded) => {
                    log_debug!(
                        "probe sequence exhausted in {} slots ({} entries, {} tombstones), forcing rehash",
                        self.slots.len(),
                        self.len,
                        self.tombstones
                    );
                    entry = stranded;
                    self.grow();
                }
            }
        }
    }

    fn find(&self, key: &K) -> Option<&V> {
        let index = self.lookup(self.hash_builder.hash_one(key), key)?;
        self.slots[index].entry().map(|(_, value)| value)
    }

    fn remove(&mut self, key: &K) -> bool {
        let Some(index) = self.lookup(self.hash_builder.hash_one(key), key) else {
            return false;
        };

        let removed = self.slots[index].bury().is_some();
        debug_assert!(removed);
        self.len -= 1;
        self.tombstones += 1;
        true
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn load_factor_threshold(&self) -> f64 {
        self.load_factor
    }

    fn display_to(&self, out: &mut dyn fmt::Write) -> fmt::Result
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        writeln!(
            out,
            "open-addressed hash table: {} entries, {} tombstones in {} slots",
            self.len,
            self.tombstones,
            self.slots.len()
        )?;

        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => {}
                Slot::Occupied(key, value) => writeln!(out, "slot [{index}]: {{{key} = {value}}}")?,
                Slot::Deleted => writeln!(out, "slot [{index}]: <deleted>")?,
            }
        }

        Ok(())
    }
}

impl<K, V, S> fmt::Display for OpenAddressingHashTable<K, V, S>
where
    K: fmt::Display + Hash + Eq,
    V: fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_to(f)
    }
}

impl<K, V, S> PartialEq for OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        self.iter().all(|(k, v)| other.find(k) == Some(v))
    }
}

impl<K, V, S> Default for OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OpenAddressingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, K, V, S> IntoIterator for &'a OpenAddressingHashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the live entries of an [`OpenAddressingHashTable`].
///
/// This struct is created by [`OpenAddressingHashTable::iter`].
pub struct Iter<'a, K, V> {
    slots: slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.slots.by_ref().find_map(Slot::entry)?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
