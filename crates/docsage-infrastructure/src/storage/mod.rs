//! Storage layer for durable client state.

mod atomic_toml;
mod key_value_store;

pub use atomic_toml::AtomicTomlFile;
pub use key_value_store::{FileKeyValueStore, MemoryKeyValueStore};
