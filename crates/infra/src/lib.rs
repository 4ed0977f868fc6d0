//! Infrastructure layer: durable storage, the cart store, configuration.

pub mod cart_storage;
pub mod cart_store;
pub mod config;
pub mod storage;


pub use cart_storage::{CartStorage, DEFAULT_STORAGE_KEY};
pub use cart_store::{CartChange, CartStore};
pub use config::{CartConfig, ConfigError};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError};
