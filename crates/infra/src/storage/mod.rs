//! Key/value blob storage.
//!
//! The cart persists one serialized blob under one key, the way a browser
//! page uses local storage. Backends only move strings around; encoding is
//! the caller's business.

pub mod file;
pub mod in_memory;
pub mod r#trait;

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;
pub use r#trait::{KeyValueStore, StorageError};
