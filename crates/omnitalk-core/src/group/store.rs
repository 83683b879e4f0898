//! Group store.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::group::model::{GroupInfo, GroupState, SelectionOutcome};
use crate::store::{KeyValueStorage, StateCodec, Store, Subscription};

/// Storage key of the group store.
pub const GROUP_STORE_NAME: &str = "group";

/// Holds the known chat groups and the user's current selection.
///
/// The group list is replaced wholesale by whoever fetches it; the selection is
/// changed by the user or repaired by [`GroupStore::set_groups`].
pub struct GroupStore {
    store: Store<GroupState>,
}

impl GroupStore {
    pub fn open(
        storage: Arc<dyn KeyValueStorage>,
        codec: Arc<dyn StateCodec<GroupState>>,
    ) -> Result<Self> {
        Ok(Self {
            store: Store::open(GROUP_STORE_NAME, storage, codec, GroupState::default())?,
        })
    }

    /// Replaces the group list, falling back to the default group when the
    /// current selection no longer exists.
    pub fn set_groups(&self, groups: Vec<GroupInfo>) -> Result<SelectionOutcome> {
        for group in groups.iter().filter(|g| !g.is_consistent()) {
            debug!(
                group_id = %group.id,
                bots = group.bots.len(),
                bot_names = group.bot_names.len(),
                bot_count = group.bot_count,
                "Group record has inconsistent bot fields"
            );
        }

        let count = groups.len();
        let outcome = self.store.update(|state| state.set_groups(groups))?;

        match &outcome {
            SelectionOutcome::Retained => {
                debug!(groups = count, "Group list replaced");
            }
            SelectionOutcome::Defaulted(id) => {
                debug!(groups = count, "Selection moved to default group {}", id);
            }
            SelectionOutcome::Dangling(id) => {
                warn!(
                    groups = count,
                    "Selected group {} no longer exists and there is no default group", id
                );
            }
        }
        Ok(outcome)
    }

    /// Selects `group_id` without checking that it exists.
    pub fn set_current_group_id(&self, group_id: impl Into<String>) -> Result<()> {
        let group_id = group_id.into();
        self.store
            .update(|state| state.current_group_id = group_id)
    }

    pub fn current_group_id(&self) -> String {
        self.store.read(|state| state.current_group_id.clone())
    }

    pub fn groups(&self) -> Vec<GroupInfo> {
        self.store.read(|state| state.groups.clone())
    }

    /// The currently selected group, or `None` if the selection matches nothing.
    pub fn current_group(&self) -> Option<GroupInfo> {
        self.store.read(|state| state.current_group().cloned())
    }

    /// Bots of the currently selected group; empty if the selection matches nothing.
    pub fn group_bots(&self) -> Vec<String> {
        self.store.read(GroupState::group_bots)
    }

    pub fn has_valid_selection(&self) -> bool {
        self.store.read(GroupState::has_valid_selection)
    }

    pub fn snapshot(&self) -> GroupState {
        self.store.snapshot()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&GroupState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn load(&self) -> Result<bool> {
        self.store.load()
    }

    pub fn save(&self) -> Result<()> {
        self.store.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::model::ALL_GROUPS_ID;
    use crate::group::model::fixtures::group;
    use crate::store::{JsonCodec, MemoryStorage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn open_store(storage: Arc<MemoryStorage>) -> GroupStore {
        GroupStore::open(storage, Arc::new(JsonCodec::<GroupState>::new())).unwrap()
    }

    #[test]
    fn test_empty_groups_yield_nothing() {
        let store = open_store(Arc::new(MemoryStorage::new()));
        store.set_groups(Vec::new()).unwrap();

        assert_eq!(store.current_group_id(), ALL_GROUPS_ID);
        assert!(store.current_group().is_none());
        assert!(store.group_bots().is_empty());
    }

    #[test]
    fn test_default_group_takes_over_sentinel() {
        let store = open_store(Arc::new(MemoryStorage::new()));
        let outcome = store
            .set_groups(vec![group("g1", true, &["b1", "b2"])])
            .unwrap();

        assert_eq!(outcome, SelectionOutcome::Defaulted("g1".to_string()));
        assert_eq!(store.current_group_id(), "g1");
        assert_eq!(store.group_bots(), vec!["b1", "b2"]);
    }

    #[test]
    fn test_set_current_group_id_is_unvalidated() {
        let store = open_store(Arc::new(MemoryStorage::new()));
        store.set_groups(vec![group("g1", true, &["b1"])]).unwrap();

        store.set_current_group_id("missing").unwrap();
        assert_eq!(store.current_group_id(), "missing");
        assert!(store.current_group().is_none());
        assert!(store.group_bots().is_empty());
        assert!(!store.has_valid_selection());
    }

    #[test]
    fn test_set_current_group_id_is_idempotent() {
        let store = open_store(Arc::new(MemoryStorage::new()));
        store
            .set_groups(vec![group("g1", true, &["a"]), group("g2", false, &["b"])])
            .unwrap();

        store.set_current_group_id("g2").unwrap();
        let once = store.snapshot();
        store.set_current_group_id("g2").unwrap();
        assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn test_current_group_lookup() {
        let store = open_store(Arc::new(MemoryStorage::new()));
        store
            .set_groups(vec![group("g1", true, &["a"]), group("g2", false, &["b", "c"])])
            .unwrap();
        store.set_current_group_id("g2").unwrap();

        let current = store.current_group().unwrap();
        assert_eq!(current.id, "g2");
        assert_eq!(store.group_bots(), vec!["b", "c"]);
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let store = open_store(storage.clone());
            store
                .set_groups(vec![group("g1", true, &["a"]), group("g2", false, &["b"])])
                .unwrap();
            store.set_current_group_id("g2").unwrap();
        }

        let reopened = open_store(storage);
        assert_eq!(reopened.groups().len(), 2);
        assert_eq!(reopened.current_group_id(), "g2");
    }

    #[test]
    fn test_every_mutation_notifies() {
        let store = open_store(Arc::new(MemoryStorage::new()));
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let _subscription = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.set_groups(vec![group("g1", true, &["a"])]).unwrap();
        store.set_current_group_id("g1").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
