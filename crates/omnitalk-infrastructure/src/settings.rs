//! Application settings loaded from `settings.toml`.
//!
//! Settings are read-only at runtime. A missing or empty file yields defaults.
//!
//! ```toml
//! storage_dir = "/var/lib/omnitalk"   # optional, defaults to <data_dir>/state
//! log_level = "debug"                 # default: "info"
//! default_mode = "parallel"           # default: "serial"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use omnitalk_core::config::{DEFAULT_MODE, Mode};
use omnitalk_core::error::{Result, StoreError};

use crate::paths::OmniPaths;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_mode() -> Mode {
    DEFAULT_MODE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the persisted stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Fallback log filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Mode a fresh configuration store starts in.
    #[serde(default = "default_mode")]
    pub default_mode: Mode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_dir: None,
            log_level: default_log_level(),
            default_mode: DEFAULT_MODE,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or from the default settings file when
    /// `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => OmniPaths::settings_file().map_err(|e| StoreError::config(e.to_string()))?,
        };
        Self::load_from(&path)
    }

    /// Loads settings from `path`. A missing or blank file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).map_err(|e| {
            StoreError::config(format!(
                "Failed to parse settings at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Directory for persisted stores: the configured override or the
    /// platform default.
    pub fn resolve_storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => OmniPaths::state_dir().map_err(|e| StoreError::config(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from(&temp_dir.path().join("settings.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.default_mode, Mode::Serial);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "default_mode = \"parallel\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.default_mode, Mode::Parallel);
        assert_eq!(settings.log_level, "info");
        assert!(settings.storage_dir.is_none());
    }

    #[test]
    fn test_storage_dir_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "storage_dir = \"/srv/omnitalk\"\nlog_level = \"debug\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(
            settings.resolve_storage_dir().unwrap(),
            PathBuf::from("/srv/omnitalk")
        );
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_invalid_mode_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "default_mode = \"broadcast\"\n").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }
}
