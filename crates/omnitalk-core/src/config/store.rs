//! Configuration store.

use std::sync::Arc;

use tracing::info;

use crate::config::model::{ConfigState, Mode};
use crate::error::Result;
use crate::store::{KeyValueStorage, StateCodec, Store, Subscription};

/// Storage key of the configuration store.
pub const CONFIG_STORE_NAME: &str = "config";

/// Holds the session configuration and keeps it durable across restarts.
///
/// The interaction mode is the only field this store mutates; `token` and
/// `username` are restored from storage or keep their defaults.
pub struct ConfigStore {
    store: Store<ConfigState>,
}

impl ConfigStore {
    /// Opens the store under [`CONFIG_STORE_NAME`], starting from `default`
    /// when nothing has been persisted yet.
    pub fn open(
        storage: Arc<dyn KeyValueStorage>,
        codec: Arc<dyn StateCodec<ConfigState>>,
        default: ConfigState,
    ) -> Result<Self> {
        Ok(Self {
            store: Store::open(CONFIG_STORE_NAME, storage, codec, default)?,
        })
    }

    pub fn token(&self) -> String {
        self.store.read(|state| state.token.clone())
    }

    pub fn username(&self) -> String {
        self.store.read(|state| state.username.clone())
    }

    pub fn mode(&self) -> Mode {
        self.store.read(|state| state.mode)
    }

    pub fn snapshot(&self) -> ConfigState {
        self.store.snapshot()
    }

    /// Replaces the interaction mode, then persists and notifies subscribers.
    pub fn update_mode(&self, mode: Mode) -> Result<()> {
        let previous = self.store.update(|state| std::mem::replace(&mut state.mode, mode))?;
        if previous != mode {
            info!("Interaction mode changed: {} -> {}", previous, mode);
        }
        Ok(())
    }

    /// Parses `mode` and applies it with [`ConfigStore::update_mode`].
    ///
    /// Unknown spellings fail with `StoreError::InvalidMode` and leave the state
    /// untouched.
    pub fn update_mode_str(&self, mode: &str) -> Result<()> {
        let mode = Mode::parse(mode)?;
        self.update_mode(mode)
    }

    /// Registers a listener called with the new configuration after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ConfigState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Re-reads the persisted configuration.
    pub fn load(&self) -> Result<bool> {
        self.store.load()
    }

    /// Writes the current configuration to storage.
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }
}
