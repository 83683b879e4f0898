//! ConfigState DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema, `mode` stored as a free-form string
//! - **1.1.0**: `mode` restricted to `parallel` / `serial`

use serde::{Deserialize, Serialize};
use tracing::warn;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use omnitalk_core::config::{ConfigState, DEFAULT_MODE, DEFAULT_USERNAME, Mode};
use omnitalk_core::error::{Result, StoreError};

fn default_username() -> String {
    DEFAULT_USERNAME.to_string()
}

/// Configuration V1.0.0 (initial version).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConfigStateV1_0_0 {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_username")]
    pub username: String,
    /// Any string was accepted here.
    pub mode: String,
}

/// Configuration V1.1.0.
///
/// `mode` became a closed enum.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct ConfigStateV1_1_0 {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_username")]
    pub username: String,
    pub mode: Mode,
}

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from V1.0.0 to V1.1.0.
/// Unknown mode strings fall back to the default mode.
impl MigratesTo<ConfigStateV1_1_0> for ConfigStateV1_0_0 {
    fn migrate(self) -> ConfigStateV1_1_0 {
        let mode = Mode::parse(&self.mode).unwrap_or_else(|_| {
            warn!(
                "Persisted mode '{}' is not recognised, falling back to '{}'",
                self.mode, DEFAULT_MODE
            );
            DEFAULT_MODE
        });

        ConfigStateV1_1_0 {
            token: self.token,
            username: self.username,
            mode,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<ConfigState> for ConfigStateV1_1_0 {
    fn into_domain(self) -> ConfigState {
        ConfigState {
            token: self.token,
            username: self.username,
            mode: self.mode,
        }
    }
}

impl FromDomain<ConfigState> for ConfigStateV1_1_0 {
    fn from_domain(state: ConfigState) -> Self {
        ConfigStateV1_1_0 {
            token: state.token,
            username: state.username,
            mode: state.mode,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for ConfigState entities.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Parses `mode` into the closed enum
/// - V1.1.0 → ConfigState: Converts DTO to domain model
pub fn create_config_state_migrator() -> Result<version_migrate::Migrator> {
    version_migrate::migrator!("config" => [
        ConfigStateV1_0_0,
        ConfigStateV1_1_0,
        ConfigState
    ], save = true)
    .map_err(|e| StoreError::migration(format!("Failed to create config migrator: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_v1_0_known_mode() {
        let migrator = create_config_state_migrator().unwrap();
        let json = serde_json::json!({
            "version": "1.0.0",
            "token": "abc",
            "username": "alice",
            "mode": "parallel"
        });

        let state: ConfigState = migrator.load_flat_from("config", json).unwrap();
        assert_eq!(state.token, "abc");
        assert_eq!(state.username, "alice");
        assert_eq!(state.mode, Mode::Parallel);
    }

    #[test]
    fn test_migrate_v1_0_unknown_mode_falls_back() {
        let migrator = create_config_state_migrator().unwrap();
        let json = serde_json::json!({
            "version": "1.0.0",
            "mode": "broadcast"
        });

        let state: ConfigState = migrator.load_flat_from("config", json).unwrap();
        assert_eq!(state.mode, DEFAULT_MODE);
        assert_eq!(state.username, "user");
        assert!(state.token.is_empty());
    }

    #[test]
    fn test_save_writes_latest_version() {
        let migrator = create_config_state_migrator().unwrap();
        let json_str = migrator
            .save_domain_flat("config", ConfigState::default())
            .unwrap();

        assert!(json_str.contains("\"version\":\"1.1.0\""));
        assert!(json_str.contains("\"mode\":\"serial\""));
    }
}
