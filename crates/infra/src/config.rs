//! Configuration loading and representation.
//!
//! Everything has a default; environment variables override:
//!
//! - `STORECART_STORAGE_KEY` — key the cart blob is stored under (`cart`)
//! - `STORECART_DATA_DIR` — directory for file-backed storage
//!   (platform data dir + `storecart`, or `./.storecart`)
//! - `STORECART_STORAGE_QUOTA` — optional byte limit on stored data

use std::path::PathBuf;

use thiserror::Error;

use crate::cart_storage::{CartStorage, DEFAULT_STORAGE_KEY};
use crate::cart_store::CartStore;
use crate::storage::FileKeyValueStore;

pub const ENV_STORAGE_KEY: &str = "STORECART_STORAGE_KEY";
pub const ENV_DATA_DIR: &str = "STORECART_DATA_DIR";
pub const ENV_STORAGE_QUOTA: &str = "STORECART_STORAGE_QUOTA";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub storage_key: String,
    pub data_dir: PathBuf,
    pub storage_quota: Option<usize>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: default_data_dir(),
            storage_quota: None,
        }
    }
}

impl CartConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::Empty {
                    var: ENV_STORAGE_KEY,
                });
            }
            config.storage_key = key.to_string();
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if dir.trim().is_empty() {
                return Err(ConfigError::Empty { var: ENV_DATA_DIR });
            }
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(quota) = lookup(ENV_STORAGE_QUOTA) {
            let parsed = quota
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::Invalid {
                    var: ENV_STORAGE_QUOTA,
                    value: quota.clone(),
                    reason: e.to_string(),
                })?;
            config.storage_quota = Some(parsed);
        }

        Ok(config)
    }

    pub fn file_store(&self) -> FileKeyValueStore {
        FileKeyValueStore::new(&self.data_dir).with_quota(self.storage_quota)
    }

    /// Open a file-backed cart store as configured.
    pub fn open_store(&self) -> CartStore<FileKeyValueStore> {
        CartStore::open(CartStorage::with_key(
            self.file_store(),
            self.storage_key.clone(),
        ))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("storecart"))
        .unwrap_or_else(|| PathBuf::from(".storecart"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.storage_key, "cart");
        assert_eq!(config.storage_quota, None);
        assert!(config.data_dir.ends_with("storecart") || config.data_dir.ends_with(".storecart"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = CartConfig::from_lookup(lookup(&[
            (ENV_STORAGE_KEY, "guest-cart"),
            (ENV_DATA_DIR, "/tmp/carts"),
            (ENV_STORAGE_QUOTA, "5242880"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, "guest-cart");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.storage_quota, Some(5_242_880));
    }

    #[test]
    fn invalid_quota_is_reported() {
        let err = CartConfig::from_lookup(lookup(&[(ENV_STORAGE_QUOTA, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var, .. } if var == ENV_STORAGE_QUOTA));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = CartConfig::from_lookup(lookup(&[(ENV_STORAGE_KEY, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { var: ENV_STORAGE_KEY });
    }

    #[test]
    fn open_store_uses_configured_dir_and_key() {
        let dir = crate::storage::file::scratch_dir();
        let config = CartConfig {
            storage_key: "cfg-cart".to_string(),
            data_dir: dir.clone(),
            storage_quota: None,
        };

        let mut store = config.open_store();
        store.add_item(storecart_core::ProductId::new(4), "Wireless Speaker", 1999.0, "");

        assert!(dir.join("cfg-cart.json").exists());
        assert_eq!(config.open_store().item_count(), 1);
        let _ = std::fs::remove_dir_all(dir);
    }
}
