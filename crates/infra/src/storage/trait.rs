use std::sync::Arc;

use thiserror::Error;

/// Storage operation error.
///
/// These are infrastructure failures. The cart store never surfaces them to
/// the presentation layer; it logs them and keeps serving from memory.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage quota exceeded writing '{key}': {required} bytes needed, {quota} allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    #[error("failed to read '{key}': {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Durable string storage addressed by key.
///
/// Mirrors the browser local-storage contract: last write wins, a missing key
/// reads as `None`, and writes may be refused (e.g. over quota).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S> KeyValueStore for Arc<S>
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Reject writes that would push total usage past `quota`.
pub(crate) fn check_quota(
    key: &str,
    required: usize,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    match quota {
        Some(quota) if required > quota => Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            required,
            quota,
        }),
        _ => Ok(()),
    }
}
