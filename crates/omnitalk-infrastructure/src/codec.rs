//! Versioned codec backed by version-migrate.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use version_migrate::Migrator;

use omnitalk_core::error::{Result, StoreError};
use omnitalk_core::store::StateCodec;

/// Encodes state as flat versioned JSON and migrates older blobs on decode.
pub struct MigratingCodec<S> {
    entity: &'static str,
    migrator: Migrator,
    _phantom: PhantomData<fn() -> S>,
}

impl<S> MigratingCodec<S> {
    /// `entity` must match the name the migrator was registered under.
    pub fn new(entity: &'static str, migrator: Migrator) -> Self {
        Self {
            entity,
            migrator,
            _phantom: PhantomData,
        }
    }
}

impl<S> StateCodec<S> for MigratingCodec<S>
where
    S: Serialize + DeserializeOwned + Clone,
{
    fn encode(&self, state: &S) -> Result<String> {
        self.migrator
            .save_domain_flat(self.entity, state.clone())
            .map_err(|e| {
                StoreError::migration(format!("Failed to serialize {}: {}", self.entity, e))
            })
    }

    fn decode(&self, blob: &str) -> Result<S> {
        let json_value: serde_json::Value = serde_json::from_str(blob)?;

        self.migrator
            .load_flat_from(self.entity, json_value)
            .map_err(|e| StoreError::migration(format!("Failed to migrate {}: {}", self.entity, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::create_config_state_migrator;
    use omnitalk_core::config::{ConfigState, Mode};

    fn codec() -> MigratingCodec<ConfigState> {
        MigratingCodec::new("config", create_config_state_migrator().unwrap())
    }

    #[test]
    fn test_encode_then_decode() {
        let codec = codec();
        let state = ConfigState {
            token: "t".to_string(),
            username: "bob".to_string(),
            mode: Mode::Parallel,
        };

        let blob = codec.encode(&state).unwrap();
        assert_eq!(codec.decode(&blob).unwrap(), state);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = codec().decode("not json at all").unwrap_err();
        assert!(err.is_serialization());
    }
}
