#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        log::trace!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

/// Runtime strategy selection over the two table implementations.
pub mod any_table;

/// Storage cells: chain buckets and tri-state open-addressing slots.
pub mod bucket;

/// A hash table using separate chaining.
///
/// This module provides a `ChainingHashTable` that keeps one owned bucket
/// sequence per slot index.
pub mod chaining;

pub mod config;

pub mod hash_table;

/// A hash table using open addressing with double hashing and tombstones.
pub mod open_addressing;

#[cfg(feature = "std")]
pub mod persist;

pub mod probe;

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(test)]
mod test_util;

pub use any_table::AnyHashTable;
pub use any_table::Strategy;
pub use chaining::ChainingHashTable;
pub use config::ConfigError;
pub use config::TableConfig;
pub use hash_table::HashTable;
pub use open_addressing::OpenAddressingHashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    }
}
