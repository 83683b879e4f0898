//! Wiring of the persisted stores over a storage backend.

use std::sync::Arc;

use tracing::info;

use omnitalk_core::config::{CONFIG_STORE_NAME, ConfigState, ConfigStore};
use omnitalk_core::error::Result;
use omnitalk_core::group::{
    CATALOG_STORE_NAME, CatalogState, GROUP_STORE_NAME, GroupCatalog, GroupContext, GroupContexts,
    GroupState, GroupStore, SelectionOutcome,
};
use omnitalk_core::store::KeyValueStorage;

use crate::codec::MigratingCodec;
use crate::dto::{
    GROUP_CONTEXT_ENTITY, create_catalog_migrator, create_config_state_migrator,
    create_group_context_migrator, create_group_state_migrator,
};
use crate::settings::Settings;
use crate::storage::FileStorage;

/// The configuration store, the group store and the group catalog (with its
/// per-group contexts), opened over one shared storage backend with versioned
/// codecs.
pub struct StoreSet {
    pub config: ConfigStore,
    pub groups: GroupStore,
    pub catalog: GroupCatalog,
}

impl StoreSet {
    /// Opens all stores over `storage`.
    pub fn open(storage: Arc<dyn KeyValueStorage>, settings: &Settings) -> Result<Self> {
        let config = ConfigStore::open(
            storage.clone(),
            Arc::new(MigratingCodec::<ConfigState>::new(
                CONFIG_STORE_NAME,
                create_config_state_migrator()?,
            )),
            ConfigState::with_default_mode(settings.default_mode),
        )?;

        let groups = GroupStore::open(
            storage.clone(),
            Arc::new(MigratingCodec::<GroupState>::new(
                GROUP_STORE_NAME,
                create_group_state_migrator()?,
            )),
        )?;

        let contexts = GroupContexts::new(
            storage.clone(),
            Arc::new(MigratingCodec::<GroupContext>::new(
                GROUP_CONTEXT_ENTITY,
                create_group_context_migrator()?,
            )),
        );

        let catalog = GroupCatalog::open(
            storage,
            Arc::new(MigratingCodec::<CatalogState>::new(
                CATALOG_STORE_NAME,
                create_catalog_migrator()?,
            )),
            contexts,
        )?;

        Ok(Self {
            config,
            groups,
            catalog,
        })
    }

    /// Opens all stores in the directory configured by `settings`.
    pub fn open_from_settings(settings: &Settings) -> Result<Self> {
        let storage = FileStorage::new(settings.resolve_storage_dir()?);
        info!("Using state directory {}", storage.base_dir().display());
        Self::open(Arc::new(storage), settings)
    }

    /// Pushes the catalog's current group list into the group store.
    pub fn sync_groups(&self) -> Result<SelectionOutcome> {
        self.groups.set_groups(self.catalog.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnitalk_core::config::Mode;
    use omnitalk_core::group::ALL_GROUPS_ID;
    use omnitalk_core::store::MemoryStorage;

    #[test]
    fn test_settings_default_mode_applies_to_fresh_config() {
        let settings = Settings {
            default_mode: Mode::Parallel,
            ..Settings::default()
        };
        let stores = StoreSet::open(Arc::new(MemoryStorage::new()), &settings).unwrap();
        assert_eq!(stores.config.mode(), Mode::Parallel);
    }

    #[test]
    fn test_sync_selects_seeded_default_group() {
        let stores =
            StoreSet::open(Arc::new(MemoryStorage::new()), &Settings::default()).unwrap();

        let outcome = stores.sync_groups().unwrap();
        assert_eq!(outcome, SelectionOutcome::Retained);
        assert_eq!(stores.groups.current_group_id(), ALL_GROUPS_ID);
        assert_eq!(stores.groups.group_bots().len(), 10);
    }
}
