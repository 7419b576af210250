use alloc::vec::Vec;
use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::slice;

use crate::bucket::Bucket;
use crate::config::ConfigError;
use crate::config::TableConfig;
use crate::hash_table::HashTable;
use crate::hash_table::grown_capacity;
use crate::hash_table::needs_growth;
use crate::probe::bucket_index;

/// A hash table that resolves collisions by separate chaining.
///
/// Each of the `capacity` slots owns a [`Bucket`] of `(K, V)` pairs. A key
/// lives in bucket `hash(key) mod capacity`; lookups scan that one bucket.
/// When a new key arrives and the load factor has reached the configured
/// threshold, every entry is moved into a bucket array of twice the size
/// before the key is placed.
///
/// # Performance Characteristics
///
/// - Expected O(1) insert, find and remove under a reasonable hasher.
/// - A hasher that sends every key to one bucket degrades all operations to a
///   linear scan of that bucket.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use twin_hash::ChainingHashTable;
/// use twin_hash::DefaultHashBuilder;
/// use twin_hash::HashTable;
///
/// let mut table: ChainingHashTable<&str, u32, DefaultHashBuilder> = ChainingHashTable::new();
/// table.insert("apple", 100);
/// table.insert("banana", 200);
/// table.insert("apple", 150);
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.find(&"apple"), Some(&150));
/// assert!(table.remove(&"banana"));
/// assert!(!table.remove(&"banana"));
/// # }
/// ```
#[derive(Clone)]
pub struct ChainingHashTable<K, V, S> {
    buckets: Vec<Bucket<K, V>>,
    len: usize,
    load_factor: f64,
    hash_builder: S,
}

impl<K, V, S> Debug for ChainingHashTable<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> ChainingHashTable<K, V, S> {
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the configured growth threshold.
    pub fn load_factor_threshold(&self) -> f64 {
        self.load_factor
    }

    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the bucket array, for inspecting chain lengths.
    pub fn buckets(&self) -> &[Bucket<K, V>] {
        &self.buckets
    }

    /// Iterates every entry in bucket order, then append order within a
    /// bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            remaining: self.len,
        }
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }
}

impl<K, V, S> ChainingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table with the default configuration and the given
    /// hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hash_builder)
    }

    /// Creates an empty table with `capacity` buckets and the given hasher
    /// builder.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
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
    /// Panics if `config` is rejected by [`TableConfig::validate`].
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        match Self::try_with_config_and_hasher(config, hash_builder) {
            Ok(table) => table,
            Err(err) => panic!("invalid table configuration: {err}"),
        }
    }

    /// Creates an empty table from `config`, rejecting invalid
    /// configurations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use twin_hash::ChainingHashTable;
    /// use twin_hash::ConfigError;
    /// use twin_hash::DefaultHashBuilder;
    /// use twin_hash::TableConfig;
    ///
    /// let bad = TableConfig::default().with_initial_capacity(0);
    /// let table = ChainingHashTable::<u8, u8, _>::try_with_config_and_hasher(
    ///     bad,
    ///     DefaultHashBuilder::default(),
    /// );
    /// assert_eq!(table.err(), Some(ConfigError::ZeroCapacity));
    /// # }
    /// ```
    pub fn try_with_config_and_hasher(
        config: TableConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        config.validate(1)?;

        Ok(Self {
            buckets: empty_buckets(config.initial_capacity),
            len: 0,
            load_factor: config.load_factor,
            hash_builder,
        })
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = bucket_index(self.hash_builder.hash_one(key), self.buckets.len());
        self.buckets[index].get_mut(key)
    }

    /// Moves every entry into `capacity` fresh buckets.
    ///
    /// Entries keep their relative order within each destination bucket. The
    /// entry count is unchanged.
    fn rehashed(
        buckets: Vec<Bucket<K, V>>,
        capacity: usize,
        hash_builder: &S,
    ) -> Vec<Bucket<K, V>> {
        let mut rehashed = empty_buckets(capacity);
        for bucket in buckets {
            for (key, value) in bucket.into_entries() {
                let index = bucket_index(hash_builder.hash_one(&key), capacity);
                rehashed[index].push(key, value);
            }
        }
        rehashed
    }

    #[cold]
    fn grow(&mut self) {
        let old_capacity = self.buckets.len();
        let capacity = grown_capacity(old_capacity);
        log_debug!(
            "rehashing chained table: {} -> {} buckets ({} entries)",
            old_capacity,
            capacity,
            self.len
        );

        let buckets = core::mem::take(&mut self.buckets);
        self.buckets = Self::rehashed(buckets, capacity, &self.hash_builder);
    }
}

impl<K, V, S> ChainingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty table with 16 buckets, a 0.9 threshold and the
    /// default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty table with `capacity` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates an empty table from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is rejected by [`TableConfig::validate`].
    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, S::default())
    }

    /// Creates an empty table from `config`, rejecting invalid
    /// configurations.
    pub fn try_with_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::try_with_config_and_hasher(config, S::default())
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Bucket<K, V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Bucket::default);
    buckets
}

impl<K, V, S> HashTable<K, V> for ChainingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) {
        let hash = self.hash_builder.hash_one(&key);

        let index = bucket_index(hash, self.buckets.len());
        if let Some(existing) = self.buckets[index].get_mut(&key) {
            *existing = value;
            return;
        }

        if needs_growth(self.len, self.buckets.len(), self.load_factor) {
            self.grow();
        }

        let index = bucket_index(hash, self.buckets.len());
        self.buckets[index].push(key, value);
        self.len += 1;
    }

    fn find(&self, key: &K) -> Option<&V> {
        let index = bucket_index(self.hash_builder.hash_one(key), self.buckets.len());
        self.buckets[index].get(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        let index = bucket_index(self.hash_builder.hash_one(key), self.buckets.len());
        if self.buckets[index].remove(key).is_some() {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
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
            "chained hash table: {} entries in {} buckets",
            self.len,
            self.buckets.len()
        )?;

        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            write!(out, "bucket [{index}]:")?;
            for (key, value) in bucket.iter() {
                write!(out, " {{{key} = {value}}}")?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

impl<K, V, S> fmt::Display for ChainingHashTable<K, V, S>
where
    K: fmt::Display + Hash + Eq,
    V: fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_to(f)
    }
}

impl<K, V, S> PartialEq for ChainingHashTable<K, V, S>
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

impl<K, V, S> Default for ChainingHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainingHashTable<K, V, S>
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

impl<K, V, S> FromIterator<(K, V)> for ChainingHashTable<K, V, S>
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

impl<'a, K, V, S> IntoIterator for &'a ChainingHashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`ChainingHashTable`].
///
/// This struct is created by [`ChainingHashTable::iter`].
pub struct Iter<'a, K, V> {
    buckets: slice::Iter<'a, Bucket<K, V>>,
    chain: slice::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, value)) = self.chain.next() {
                self.remaining -= 1;
                return Some((key, value));
            }
            self.chain = self.buckets.next()?.as_slice().iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::test_util::ConstantBuildHasher;
    use crate::test_util::IdentityBuildHasher;
    use crate::test_util::SipHashBuilder;

    type Table<K, V> = ChainingHashTable<K, V, SipHashBuilder>;

    #[test]
    fn insert_and_find() {
        let mut table: Table<u32, String> = Table::new();
        table.insert(1, "one".to_string());

        assert_eq!(table.find(&1), Some(&"one".to_string()));
        assert_eq!(table.find(&999), None);
    }

    #[test]
    fn update_existing() {
        let mut table: Table<u32, &str> = Table::new();
        table.insert(1, "old");
        table.insert(1, "new");

        assert_eq!(table.find(&1), Some(&"new"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn remove_scenarios() {
        let mut table: Table<u32, &str> = Table::new();
        table.insert(10, "ten");

        assert!(table.remove(&10));
        assert_eq!(table.len(), 0);
        assert!(!table.remove(&10));
        assert_eq!(table.find(&10), None);
    }

    #[test]
    fn defaults() {
        let table: Table<u32, &str> = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.load_factor(), 0.0);
        assert_eq!(table.load_factor_threshold(), 0.9);
    }

    #[test]
    fn twenty_inserts_grow_past_sixteen() {
        let mut table: Table<u32, &str> = Table::new();
        for i in 0..20 {
            table.insert(i, "val");
        }

        assert_eq!(table.len(), 20);
        assert_eq!(table.capacity(), 32);
        for i in 0..20 {
            assert_eq!(table.find(&i), Some(&"val"));
        }
    }

    #[test]
    fn growth_checked_before_new_key() {
        let config = TableConfig::default()
            .with_initial_capacity(2)
            .with_load_factor(1.0);
        let mut table: Table<u32, &str> = Table::with_config(config);

        table.insert(1, "a");
        table.insert(2, "b");
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.load_factor(), 1.0);

        // Updates never grow, even at the threshold.
        table.insert(2, "B");
        assert_eq!(table.capacity(), 2);

        table.insert(3, "c");
        assert!(table.capacity() >= 4);
        assert_eq!(table.find(&1), Some(&"a"));
        assert_eq!(table.find(&2), Some(&"B"));
        assert_eq!(table.find(&3), Some(&"c"));
    }

    #[test]
    fn every_rehash_doubles_and_preserves_content() {
        let mut table: Table<u64, u64> = Table::with_capacity(1);
        let mut capacity = table.capacity();

        for k in 0..1000u64 {
            let len_before = table.len();
            let load_before = table.load_factor();
            table.insert(k, k * 3);

            if load_before >= table.load_factor_threshold() {
                assert_eq!(table.capacity(), capacity * 2);
                capacity = table.capacity();
                for j in 0..=k {
                    assert_eq!(table.find(&j), Some(&(j * 3)));
                }
            } else {
                assert_eq!(table.capacity(), capacity);
            }
            assert_eq!(table.len(), len_before + 1);
        }
    }

    #[test]
    fn rehash_keeps_entry_count_and_bucket_placement() {
        let mut table: ChainingHashTable<u32, u32, _> =
            ChainingHashTable::with_capacity_and_hasher(4, IdentityBuildHasher);
        for k in 0..4 {
            table.insert(k, k);
        }
        assert_eq!(table.capacity(), 4);

        table.insert(4, 4);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.len(), 5);
        assert_eq!(table.buckets().iter().map(Bucket::len).sum::<usize>(), 5);
        for (index, bucket) in table.buckets().iter().enumerate() {
            for (key, _) in bucket.iter() {
                assert_eq!(*key as usize % 8, index);
            }
        }
    }

    #[test]
    fn single_bucket_collisions() {
        let mut table: ChainingHashTable<u32, u32, _> =
            ChainingHashTable::with_hasher(ConstantBuildHasher);
        for k in 0..200 {
            table.insert(k, k + 1);
        }

        assert_eq!(table.len(), 200);
        let chained: Vec<usize> = table.buckets().iter().map(Bucket::len).collect();
        assert_eq!(chained.iter().filter(|&&n| n > 0).count(), 1);

        for k in (0..200).step_by(3) {
            assert!(table.remove(&k));
        }
        for k in 0..200 {
            let expected = if k % 3 == 0 { None } else { Some(&(k + 1)) };
            assert_eq!(table.find(&k), expected);
        }
    }

    #[test]
    fn matches_model_under_random_operations() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut table: Table<u16, u32> = Table::with_capacity(2);
        let mut model = BTreeMap::new();

        for step in 0..20_000u32 {
            let key = rng.random_range(0..512u16);
            match rng.random_range(0..3u8) {
                0 | 1 => {
                    table.insert(key, step);
                    model.insert(key, step);
                }
                _ => {
                    assert_eq!(table.remove(&key), model.remove(&key).is_some());
                }
            }
            assert_eq!(table.len(), model.len());
        }

        for key in 0..512u16 {
            assert_eq!(table.find(&key), model.get(&key));
        }
        assert_eq!(table.iter().count(), model.len());
    }

    #[test]
    fn display_lists_buckets_in_order() {
        let mut table: ChainingHashTable<u32, &str, _> =
            ChainingHashTable::with_hasher(IdentityBuildHasher);
        table.insert(17, "b");
        table.insert(1, "a");
        table.insert(3, "c");

        let rendered = table.to_string();
        assert_eq!(
            rendered,
            "chained hash table: 3 entries in 16 buckets\n\
             bucket [1]: {17 = b} {1 = a}\n\
             bucket [3]: {3 = c}\n"
        );
    }

    #[test]
    fn iter_covers_every_entry() {
        let table: Table<u32, u32> = (0..50).map(|k| (k, k * k)).collect();

        let mut seen: Vec<(u32, u32)> = table.iter().map(|(k, v)| (*k, *v)).collect();
        seen.sort();
        assert_eq!(seen, (0..50).map(|k| (k, k * k)).collect::<Vec<_>>());
        assert_eq!(table.iter().len(), 50);
        assert_eq!((&table).into_iter().count(), 50);
    }

    #[test]
    fn replay_order_does_not_matter() {
        let pairs = vec![(1u32, "a"), (2, "b"), (1, "c"), (3, "d")];

        let forward: Table<u32, &str> = pairs.iter().copied().collect();
        let mut backward: Table<u32, &str> = Table::new();
        backward.extend(pairs.iter().copied().filter(|&(k, v)| k != 1 || v == "c"));

        assert_eq!(forward, backward);
        assert_eq!(forward.find(&1), Some(&"c"));
    }

    #[test]
    fn find_mut_and_clear() {
        let mut table: Table<u32, u32> = (0..10).map(|k| (k, k)).collect();
        *table.find_mut(&4).unwrap() += 100;
        assert_eq!(table.find(&4), Some(&104));
        assert_eq!(table.find_mut(&40), None);

        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.find(&4), None);
    }

    #[test]
    fn clone_is_independent() {
        let mut original: Table<u32, String> = Table::new();
        original.insert(100, "original".to_string());

        let mut copy = original.clone();
        assert_eq!(copy.find(&100), Some(&"original".to_string()));

        copy.insert(100, "changed".to_string());
        assert_eq!(original.find(&100), Some(&"original".to_string()));
    }

    #[test]
    fn debug_is_a_map() {
        let mut table: ChainingHashTable<u32, u32, _> =
            ChainingHashTable::with_hasher(IdentityBuildHasher);
        table.insert(2, 20);
        table.insert(1, 10);
        assert_eq!(alloc::format!("{table:?}"), "{1: 10, 2: 20}");
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = TableConfig::default().with_initial_capacity(0);
        assert_eq!(
            Table::<u32, u32>::try_with_config(config).err(),
            Some(ConfigError::ZeroCapacity)
        );
    }

    #[test]
    #[should_panic(expected = "invalid table configuration")]
    fn with_config_panics_on_bad_load_factor() {
        let config = TableConfig::default().with_load_factor(1.5);
        let _ = Table::<u32, u32>::with_config(config);
    }

    #[cfg(feature = "std")]
    #[test]
    fn measure_find_time_leaves_table_untouched() {
        let table: Table<u32, u32> = (0..64).map(|k| (k, k)).collect();
        let keys: Vec<u32> = (0..128).collect();

        let seconds = table.measure_find_time(&keys, 5);
        assert!(seconds >= 0.0);
        assert_eq!(table.len(), 64);
        assert_eq!(table.find(&7), Some(&7));
    }
}
