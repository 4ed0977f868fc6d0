use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::r#trait::{KeyValueStore, StorageError, check_quota};

const EXTENSION: &str = "json";

/// Directory-backed key/value store: one file per key.
///
/// Survives process restarts, which makes it the desktop stand-in for browser
/// local storage. Writes land in a temp file first and are renamed into place,
/// so a crash mid-write never leaves a truncated blob behind.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
    quota: Option<usize>,
}

impl FileKeyValueStore {
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quota: None,
        }
    }

    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }

    /// Bytes used by every other key in the directory.
    fn usage_excluding(&self, target: &Path) -> Result<usize, StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(StorageError::Read {
                    key: self.dir.display().to_string(),
                    source,
                });
            }
        };

        let mut total = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path == target || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let key_len = path
                .file_stem()
                .map(|stem| stem.len())
                .unwrap_or_default();
            let value_len = entry.metadata().map(|m| m.len() as usize).unwrap_or_default();
            total += key_len + value_len;
        }
        Ok(total)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        if self.quota.is_some() {
            let required = self.usage_excluding(&path)? + key.len() + value.len();
            check_quota(key, required, self.quota)?;
        }

        let write_err = |source: std::io::Error| StorageError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let tmp = self.dir.join(format!(".{key}.{}.tmp", Uuid::now_v7()));
        if let Err(source) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }
        fs::rename(&tmp, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            write_err(source)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("storecart-test-{}", Uuid::now_v7()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_reads_as_empty() {
        let store = FileKeyValueStore::new(scratch_dir());
        assert_eq!(store.get("cart").unwrap(), None);
        store.remove("cart").unwrap();
    }

    #[test]
    fn values_survive_a_new_handle() {
        let dir = scratch_dir();
        FileKeyValueStore::new(&dir).set("cart", "[]").unwrap();

        let reopened = FileKeyValueStore::new(&dir);
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));

        reopened.remove("cart").unwrap();
        assert_eq!(reopened.get("cart").unwrap(), None);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn rejects_path_like_keys() {
        let store = FileKeyValueStore::new(scratch_dir());
        for key in ["", "../cart", "a/b", ".hidden"] {
            assert!(matches!(
                store.set(key, "x").unwrap_err(),
                StorageError::InvalidKey(_)
            ));
        }
    }

    #[test]
    fn quota_counts_other_keys_but_not_the_one_replaced() {
        let dir = scratch_dir();
        let store = FileKeyValueStore::new(&dir).with_quota(Some(20));
        store.set("a", "12345").unwrap();
        store.set("a", "1234567890").unwrap();

        let err = store.set("b", "1234567890").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.get("b").unwrap(), None);
        let _ = fs::remove_dir_all(dir);
    }
}
