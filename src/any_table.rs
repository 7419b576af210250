use core::fmt;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::chaining;
use crate::chaining::ChainingHashTable;
use crate::config::ConfigError;
use crate::config::TableConfig;
use crate::hash_table::HashTable;
use crate::open_addressing;
use crate::open_addressing::OpenAddressingHashTable;

/// The collision-resolution strategy of an [`AnyHashTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Separate chaining; see [`ChainingHashTable`].
    Chaining,
    /// Open addressing with double hashing; see [`OpenAddressingHashTable`].
    OpenAddressing,
}

/// A hash table whose strategy is chosen when it is constructed.
///
/// Every operation dispatches to the wrapped table, so callers can switch
/// strategies without changing code written against [`HashTable`].
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use twin_hash::AnyHashTable;
/// use twin_hash::DefaultHashBuilder;
/// use twin_hash::HashTable;
/// use twin_hash::Strategy;
/// use twin_hash::TableConfig;
///
/// for strategy in [Strategy::Chaining, Strategy::OpenAddressing] {
///     let mut table: AnyHashTable<&str, u32, DefaultHashBuilder> =
///         AnyHashTable::with_config(strategy, TableConfig::default());
///     table.insert("login", 7);
///     assert_eq!(table.strategy(), strategy);
///     assert_eq!(table.find(&"login"), Some(&7));
/// }
/// # }
/// ```
#[derive(Debug, Clone)]
pub enum AnyHashTable<K, V, S> {
    /// A separately chained table.
    Chaining(ChainingHashTable<K, V, S>),
    /// A double-hashing open-addressed table.
    OpenAddressing(OpenAddressingHashTable<K, V, S>),
}

impl<K, V, S> AnyHashTable<K, V, S> {
    /// Returns the strategy of the wrapped table.
    pub fn strategy(&self) -> Strategy {
        match self {
            AnyHashTable::Chaining(_) => Strategy::Chaining,
            AnyHashTable::OpenAddressing(_) => Strategy::OpenAddressing,
        }
    }

    /// Returns an iterator over the live entries of the wrapped table.
    pub fn iter(&self) -> Iter<'_, K, V> {
        match self {
            AnyHashTable::Chaining(table) => Iter::Chaining(table.iter()),
            AnyHashTable::OpenAddressing(table) => Iter::OpenAddressing(table.iter()),
        }
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        match self {
            AnyHashTable::Chaining(table) => table.clear(),
            AnyHashTable::OpenAddressing(table) => table.clear(),
        }
    }
}

impl<K, V, S> AnyHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty table of the given strategy from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is rejected for the chosen strategy.
    pub fn with_config_and_hasher(strategy: Strategy, config: TableConfig, hash_builder: S) -> Self {
        match Self::try_with_config_and_hasher(strategy, config, hash_builder) {
            Ok(table) => table,
            Err(err) => panic!("invalid table configuration: {err}"),
        }
    }

    /// Creates an empty table of the given strategy from `config`, rejecting
    /// invalid configurations.
    pub fn try_with_config_and_hasher(
        strategy: Strategy,
        config: TableConfig,
        hash_builder: S,
    ) -> Result<Self, ConfigError> {
        Ok(match strategy {
            Strategy::Chaining => AnyHashTable::Chaining(
                ChainingHashTable::try_with_config_and_hasher(config, hash_builder)?,
            ),
            Strategy::OpenAddressing => AnyHashTable::OpenAddressing(
                OpenAddressingHashTable::try_with_config_and_hasher(config, hash_builder)?,
            ),
        })
    }
}

impl<K, V, S> AnyHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty table of the given strategy with the default
    /// configuration and hasher builder.
    pub fn new(strategy: Strategy) -> Self {
        Self::with_config(strategy, TableConfig::default())
    }

    /// Creates an empty table of the given strategy from `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is rejected for the chosen strategy.
    pub fn with_config(strategy: Strategy, config: TableConfig) -> Self {
        Self::with_config_and_hasher(strategy, config, S::default())
    }

    /// Creates an empty table of the given strategy from `config`, rejecting
    /// invalid configurations.
    pub fn try_with_config(strategy: Strategy, config: TableConfig) -> Result<Self, ConfigError> {
        Self::try_with_config_and_hasher(strategy, config, S::default())
    }
}

impl<K, V, S> HashTable<K, V> for AnyHashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) {
        match self {
            AnyHashTable::Chaining(table) => table.insert(key, value),
            AnyHashTable::OpenAddressing(table) => table.insert(key, value),
        }
    }

    fn find(&self, key: &K) -> Option<&V> {
        match self {
            AnyHashTable::Chaining(table) => table.find(key),
            AnyHashTable::OpenAddressing(table) => table.find(key),
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        match self {
            AnyHashTable::Chaining(table) => table.remove(key),
            AnyHashTable::OpenAddressing(table) => table.remove(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnyHashTable::Chaining(table) => table.len(),
            AnyHashTable::OpenAddressing(table) => table.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            AnyHashTable::Chaining(table) => table.capacity(),
            AnyHashTable::OpenAddressing(table) => table.capacity(),
        }
    }

    fn load_factor_threshold(&self) -> f64 {
        match self {
            AnyHashTable::Chaining(table) => table.load_factor_threshold(),
            AnyHashTable::OpenAddressing(table) => table.load_factor_threshold(),
        }
    }

    fn display_to(&self, out: &mut dyn fmt::Write) -> fmt::Result
    where
        K: fmt::Display,
        V: fmt::Display,
    {
        match self {
            AnyHashTable::Chaining(table) => table.display_to(out),
            AnyHashTable::OpenAddressing(table) => table.display_to(out),
        }
    }
}

impl<K, V, S> fmt::Display for AnyHashTable<K, V, S>
where
    K: fmt::Display + Hash + Eq,
    V: fmt::Display,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display_to(f)
    }
}

impl<K, V, S> Extend<(K, V)> for AnyHashTable<K, V, S>
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

impl<'a, K, V, S> IntoIterator for &'a AnyHashTable<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of an [`AnyHashTable`].
pub enum Iter<'a, K, V> {
    /// Entries of a chained table.
    Chaining(chaining::Iter<'a, K, V>),
    /// Entries of an open-addressed table.
    OpenAddressing(open_addressing::Iter<'a, K, V>),
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Chaining(iter) => iter.next(),
            Iter::OpenAddressing(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Chaining(iter) => iter.size_hint(),
            Iter::OpenAddressing(iter) => iter.size_hint(),
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
