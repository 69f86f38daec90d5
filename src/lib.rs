#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod builder;

pub mod cursor;

/// Error type shared by the map, the table and the load policy.
pub mod error;

/// A HashMap keeping its entries in a dense store.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

pub mod hash_table;

/// Rehash thresholds.
pub mod policy;

pub use cursor::Cursor;
pub use cursor::CursorMut;
pub use error::Error;
pub use hash_map::DefaultHashBuilder;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use policy::LoadPolicy;
