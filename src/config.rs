//! Construction-time table configuration.
//!
//! Both table strategies are built from a [`TableConfig`]. Invalid
//! configurations are a caller precondition violation: the fallible
//! constructors report them as a [`ConfigError`], the infallible ones panic
//! with the same message.

/// Initial slot count used by [`TableConfig::default`].
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

/// Load factor threshold used by [`TableConfig::default`].
pub const DEFAULT_LOAD_FACTOR: f64 = 0.9;

/// Errors reported when a [`TableConfig`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The initial capacity was zero.
    #[error("initial capacity must be positive")]
    ZeroCapacity,

    /// The initial capacity is below the minimum the strategy can probe.
    #[error("initial capacity {requested} is below the minimum of {minimum}")]
    CapacityTooSmall {
        /// The capacity that was asked for.
        requested: usize,
        /// The smallest capacity the strategy accepts.
        minimum: usize,
    },

    /// The load factor threshold was outside `(0, 1]`.
    #[error("load factor threshold {load_factor} is outside (0, 1]")]
    InvalidLoadFactor {
        /// The rejected threshold.
        load_factor: f64,
    },
}

/// Initial capacity and growth threshold for a table.
///
/// # Examples
///
/// ```rust
/// use twin_hash::TableConfig;
///
/// let config = TableConfig::default()
///     .with_initial_capacity(64)
///     .with_load_factor(0.75);
/// assert_eq!(config.initial_capacity, 64);
/// assert!(config.validate(1).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Number of slots allocated up front.
    pub initial_capacity: usize,
    /// Growth threshold; a new-key insertion first rehashes when
    /// `len / capacity` has reached this value.
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    /// Returns this configuration with a different initial capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Returns this configuration with a different load factor threshold.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Checks the configuration against a strategy's minimum capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use twin_hash::ConfigError;
    /// use twin_hash::TableConfig;
    ///
    /// let config = TableConfig::default().with_initial_capacity(1);
    /// assert_eq!(
    ///     config.validate(2),
    ///     Err(ConfigError::CapacityTooSmall {
    ///         requested: 1,
    ///         minimum: 2
    ///     })
    /// );
    /// ```
    pub fn validate(&self, minimum_capacity: usize) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.initial_capacity < minimum_capacity {
            return Err(ConfigError::CapacityTooSmall {
                requested: self.initial_capacity,
                minimum: minimum_capacity,
            });
        }

        // NaN fails both comparisons.
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(ConfigError::InvalidLoadFactor {
                load_factor: self.load_factor,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let config = TableConfig::default();
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.load_factor, 0.9);
        assert_eq!(config.validate(2), Ok(()));
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = TableConfig::default().with_initial_capacity(0);
        assert_eq!(config.validate(1), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn rejects_capacity_below_minimum() {
        let config = TableConfig::default().with_initial_capacity(1);
        assert!(config.validate(1).is_ok());
        assert_eq!(
            config.validate(2),
            Err(ConfigError::CapacityTooSmall {
                requested: 1,
                minimum: 2
            })
        );
    }

    #[test]
    fn rejects_out_of_range_load_factor() {
        for load_factor in [0.0, -0.5, 1.01, f64::INFINITY] {
            let config = TableConfig::default().with_load_factor(load_factor);
            assert_eq!(
                config.validate(1),
                Err(ConfigError::InvalidLoadFactor { load_factor })
            );
        }

        let config = TableConfig::default().with_load_factor(f64::NAN);
        assert!(matches!(
            config.validate(1),
            Err(ConfigError::InvalidLoadFactor { .. })
        ));
    }

    #[test]
    fn accepts_full_load_factor() {
        let config = TableConfig::default()
            .with_initial_capacity(2)
            .with_load_factor(1.0);
        assert_eq!(config.validate(2), Ok(()));
    }

    #[test]
    fn error_messages() {
        use alloc::string::ToString;

        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "initial capacity must be positive"
        );
        assert_eq!(
            ConfigError::CapacityTooSmall {
                requested: 1,
                minimum: 2
            }
            .to_string(),
            "initial capacity 1 is below the minimum of 2"
        );
    }
}
