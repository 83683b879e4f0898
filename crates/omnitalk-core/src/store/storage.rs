//! Persistence seams of a [`Store`](super::Store).
//!
//! A store never touches the file system itself. It hands a serialized blob to a
//! [`KeyValueStorage`] under its name and asks a [`StateCodec`] to turn state into
//! that blob and back.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{PoisonError, RwLock};

use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

/// Durable key-value storage addressed by store name.
///
/// Implementations are expected to make `set` atomic per key: a reader sees
/// either the previous blob or the new one, never a partial write.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if nothing was written yet.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes the blob stored under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Converts a store's state to and from its persisted blob.
pub trait StateCodec<S>: Send + Sync {
    fn encode(&self, state: &S) -> Result<String>;

    fn decode(&self, blob: &str) -> Result<S>;
}

/// Unversioned JSON codec.
///
/// Suitable for tests and throwaway stores; durable stores should use a
/// versioned codec so that older blobs keep loading after the schema moves.
pub struct JsonCodec<S> {
    _phantom: PhantomData<fn() -> S>,
}

impl<S> JsonCodec<S> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<S> Default for JsonCodec<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateCodec<S> for JsonCodec<S>
where
    S: Serialize + DeserializeOwned,
{
    fn encode(&self, state: &S) -> Result<String> {
        Ok(serde_json::to_string(state)?)
    }

    fn decode(&self, blob: &str) -> Result<S> {
        Ok(serde_json::from_str(blob)?)
    }
}

/// Process-local storage backed by a `HashMap`.
///
/// Contents vanish with the process. Used for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert!(storage.get("config").unwrap().is_none());

        storage.set("config", "{}").unwrap();
        assert_eq!(storage.get("config").unwrap().as_deref(), Some("{}"));
        assert_eq!(storage.len(), 1);

        storage.remove("config").unwrap();
        storage.remove("config").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_json_codec() {
        let codec = JsonCodec::<Sample>::new();
        let blob = codec
            .encode(&Sample {
                name: "a".into(),
                count: 3,
            })
            .unwrap();
        let decoded = codec.decode(&blob).unwrap();
        assert_eq!(decoded.count, 3);

        let err = codec.decode("not json").unwrap_err();
        assert!(err.is_serialization());
    }
}
