//! Storage layer for atomic file operations.

mod atomic;
mod atomic_toml;
mod key_value;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use key_value::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
