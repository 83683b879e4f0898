//! Directory-backed key-value storage.

use std::path::{Path, PathBuf};

use omnitalk_core::error::{Result, StoreError};
use omnitalk_core::store::KeyValueStorage;
use tracing::debug;

use super::atomic_file::AtomicFile;

/// Stores each key as `<base_dir>/<key>.json`.
///
/// Keys are restricted to ASCII letters, digits, `-` and `_` so that a key can
/// never escape the base directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    const EXTENSION: &'static str = "json";

    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::config(format!("Invalid storage key: '{}'", key)));
        }
        Ok(self
            .base_dir
            .join(format!("{}.{}", key, Self::EXTENSION)))
    }

    fn file(&self, key: &str) -> Result<AtomicFile> {
        Ok(AtomicFile::new(self.path_for(key)?))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.file(key)?.load()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file(key)?;
        file.save(value)?;
        debug!(key, path = %file.path().display(), "Wrote state file");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.file(key)?.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_through_files() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.get("config").unwrap().is_none());
        storage.set("config", "{\"version\":\"1.1.0\"}").unwrap();

        assert!(temp_dir.path().join("config.json").exists());
        assert_eq!(
            storage.get("config").unwrap().as_deref(),
            Some("{\"version\":\"1.1.0\"}")
        );

        storage.remove("config").unwrap();
        assert!(storage.get("config").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let storage = FileStorage::new("/tmp/unused");
        for key in ["", "../config", "a/b", "group.json"] {
            let err = storage.get(key).unwrap_err();
            assert!(matches!(err, StoreError::Config(_)), "key {:?}", key);
        }
    }
}
