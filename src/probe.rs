//! Slot addressing for both table strategies.
//!
//! Chaining maps a hash straight to one bucket; open addressing walks a
//! double-hashing probe sequence.

/// Maps a hash to its bucket in a table of `capacity` slots.
#[inline(always)]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}

/// The double-hashing probe sequence for one key.
///
/// Attempt `i` visits `(h1 + i * h2) mod capacity` where
/// `h1 = hash mod capacity` and `h2 = 1 + hash mod (capacity - 1)`. `h2` is
/// never zero, so every step advances. The sequence yields exactly
/// `capacity` indices.
///
/// Full coverage of the table requires `gcd(h2, capacity) == 1`, which
/// power-of-two growth does not guarantee. A key whose step shares a factor
/// with the capacity revisits a subset of slots; callers treat a sequence
/// that ends without a usable slot as exhaustion and grow the table.
///
/// # Examples
///
/// ```rust
/// use twin_hash::probe::ProbeSequence;
///
/// // hash 17 in 16 slots: h1 = 1, h2 = 1 + 17 % 15 = 3
/// let probes: Vec<usize> = ProbeSequence::new(17, 16).take(4).collect();
/// assert_eq!(probes, [1, 4, 7, 10]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    index: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSequence {
    /// Starts the probe sequence of `hash` in a table of `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2`; the secondary hash is taken modulo
    /// `capacity - 1`.
    pub fn new(hash: u64, capacity: usize) -> Self {
        assert!(capacity >= 2, "double hashing needs at least two slots");

        let h1 = (hash % capacity as u64) as usize;
        let h2 = 1 + (hash % (capacity as u64 - 1)) as usize;

        Self {
            index: h1,
            step: h2,
            capacity,
            remaining: capacity,
        }
    }

    /// Returns the distance between consecutive probes.
    pub fn step(&self) -> usize {
        self.step
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.index;
        // Both terms are below `capacity`, so the sum cannot overflow.
        self.index += self.step;
        if self.index >= self.capacity {
            self.index -= self.capacity;
        }

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
