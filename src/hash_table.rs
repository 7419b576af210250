//! The operation surface shared by every table strategy, and the growth
//! policy that drives their rehashing.
//!
//! Strategies own their storage and rehash body; when to grow and by how much
//! is decided here so both strategies resize identically.

use core::fmt;

/// Returns `len / capacity`.
#[inline]
pub fn load_factor(len: usize, capacity: usize) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    len as f64 / capacity as f64
}

/// Returns `true` if a new-key insertion must be preceded by a rehash.
///
/// The check runs before the insertion, so a table may briefly sit at or
/// above its threshold until the next new key arrives.
#[inline]
pub fn needs_growth(len: usize, capacity: usize, threshold: f64) -> bool {
    load_factor(len, capacity) >= threshold
}

/// Returns the capacity a table grows to from `capacity`.
///
/// # Panics
///
/// Panics if doubling overflows `usize`.
#[inline]
pub fn grown_capacity(capacity: usize) -> usize {
    capacity.checked_mul(2).expect("capacity overflow")
}

/// The contract implemented by every hash table strategy.
///
/// `insert` is a pure upsert: it never reports whether the key was new, and
/// replaying the same set of insertions in any order produces the same
/// mapping. Absence is never an error: `find` returns `None` and `remove`
/// returns `false`.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use twin_hash::ChainingHashTable;
/// use twin_hash::DefaultHashBuilder;
/// use twin_hash::HashTable;
/// use twin_hash::OpenAddressingHashTable;
///
/// fn fill(table: &mut impl HashTable<u32, &'static str>) {
///     table.insert(1, "one");
///     table.insert(2, "two");
///     table.insert(1, "uno");
/// }
///
/// let mut chained: ChainingHashTable<_, _, DefaultHashBuilder> = ChainingHashTable::new();
/// let mut probed: OpenAddressingHashTable<_, _, DefaultHashBuilder> =
///     OpenAddressingHashTable::new();
/// fill(&mut chained);
/// fill(&mut probed);
///
/// assert_eq!(chained.find(&1), Some(&"uno"));
/// assert_eq!(probed.find(&1), Some(&"uno"));
/// assert_eq!(chained.len(), probed.len());
/// # }
/// ```
pub trait HashTable<K, V> {
    /// Inserts `value` under `key`, replacing the value of an existing key.
    ///
    /// A new key first triggers a rehash to double capacity if the load
    /// factor has reached the threshold. Updates never rehash.
    fn insert(&mut self, key: K, value: V);

    /// Returns the value stored under `key`.
    fn find(&self, key: &K) -> Option<&V>;

    /// Removes `key`, returning whether it was present. Tables never shrink.
    fn remove(&mut self, key: &K) -> bool;

    /// Returns the number of live entries.
    fn len(&self) -> usize;

    /// Returns the number of slots in the backing storage.
    fn capacity(&self) -> usize;

    /// Returns the load factor at which a new-key insertion rehashes first.
    fn load_factor_threshold(&self) -> f64;

    /// Writes a human-readable listing of every live entry to `out`.
    ///
    /// The format is for diagnostics only and is not meant to be parsed.
    fn display_to(&self, out: &mut dyn fmt::Write) -> fmt::Result
    where
        K: fmt::Display,
        V: fmt::Display;

    /// Returns `true` if the table holds no live entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is present.
    fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns `len / capacity`, computed on every call.
    fn load_factor(&self) -> f64 {
        load_factor(self.len(), self.capacity())
    }

    /// Runs `find` over `keys` `repetitions` times and returns the elapsed
    /// wall-clock time in seconds.
    ///
    /// This is a benchmarking aid; it blocks for the full repetition count and
    /// leaves the table untouched.
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
    /// let table: OpenAddressingHashTable<u64, u64, DefaultHashBuilder> =
    ///     (0..100).map(|k| (k, k)).collect();
    /// let keys: Vec<u64> = (0..200).collect();
    /// let seconds = table.measure_find_time(&keys, 10);
    /// assert!(seconds >= 0.0);
    /// # }
    /// ```
    #[cfg(feature = "std")]
    fn measure_find_time(&self, keys: &[K], repetitions: usize) -> f64 {
        let start = std::time::Instant::now();

        for _ in 0..repetitions {
            for key in keys {
                core::hint::black_box(self.find(key));
            }
        }

        let seconds = start.elapsed().as_secs_f64();
        log_trace!(
            "measured {} lookups x {} repetitions in {:.6}s",
            keys.len(),
            repetitions,
            seconds
        );
        seconds
    }
}
