//! Session configuration domain model.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{Result, StoreError};

/// Display name used until the user picks one.
pub const DEFAULT_USERNAME: &str = "user";

/// Mode a fresh configuration starts in unless settings override it.
pub const DEFAULT_MODE: Mode = Mode::Serial;

/// How a message is dispatched to the bots of a group.
///
/// Persisted and parsed in lowercase (`"parallel"` / `"serial"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Every bot answers at the same time.
    Parallel,
    /// Bots answer one after another, each seeing the previous replies.
    Serial,
}

impl Mode {
    /// Parses the string spelling of a mode.
    ///
    /// Surrounding whitespace is ignored; anything other than `parallel` or
    /// `serial` fails with [`StoreError::InvalidMode`].
    pub fn parse(value: &str) -> Result<Self> {
        value
            .trim()
            .parse()
            .map_err(|_| StoreError::InvalidMode(value.to_string()))
    }
}

impl Default for Mode {
    fn default() -> Self {
        DEFAULT_MODE
    }
}

/// Session-scoped configuration that survives restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigState {
    /// Opaque credential string, empty until the host application stores one.
    pub token: String,
    /// Display name of the local user.
    pub username: String,
    /// Current interaction mode.
    pub mode: Mode,
}

impl ConfigState {
    /// Creates the initial configuration with the given default mode.
    pub fn with_default_mode(mode: Mode) -> Self {
        Self {
            token: String::new(),
            username: DEFAULT_USERNAME.to_string(),
            mode,
        }
    }
}

impl Default for ConfigState {
    fn default() -> Self {
        Self::with_default_mode(DEFAULT_MODE)
    }
}
