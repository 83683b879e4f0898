//! Unified path management for omnitalk files.
//!
//! Platform directories are resolved via AppPaths from the version-migrate
//! crate, so the same layout is used on Linux, macOS and Windows.

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for omnitalk.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/omnitalk/          # Config directory
/// └── settings.toml            # Application settings
///
/// ~/.local/share/omnitalk/     # Data directory
/// └── state/                   # Persisted stores, one file per store
///     ├── config.json
///     ├── group.json
///     ├── catalog.json
///     └── context_<group_id>.json  # One per group context
/// ```
pub struct OmniPaths;

impl OmniPaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("omnitalk")
    }

    /// Returns the omnitalk configuration directory (e.g. `~/.config/omnitalk/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the omnitalk data directory (e.g. `~/.local/share/omnitalk/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// Returns the path to the settings file.
    pub fn settings_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("settings.toml"))
    }

    /// Returns the default directory holding persisted store blobs.
    pub fn state_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("state"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = OmniPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("omnitalk"));
    }

    #[test]
    fn test_settings_file() {
        let settings_file = OmniPaths::settings_file().unwrap();
        assert!(settings_file.ends_with("settings.toml"));
        let config_dir = OmniPaths::config_dir().unwrap();
        assert!(settings_file.starts_with(&config_dir));
    }

    #[test]
    fn test_state_dir() {
        let state_dir = OmniPaths::state_dir().unwrap();
        assert!(state_dir.ends_with("state"));
        let data_dir = OmniPaths::data_dir().unwrap();
        assert!(state_dir.starts_with(&data_dir));
    }
}
