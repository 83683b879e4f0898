//! Group catalog: the authoritative list of chat groups.
//!
//! The catalog owns group creation, renaming and deletion, and produces the
//! lists that are pushed into the [`GroupStore`](super::GroupStore). It is
//! persisted through its own [`Store`] under [`CATALOG_STORE_NAME`], and keeps
//! the per-group [`GroupContexts`] in step with its groups.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, StoreError};
use crate::group::context::{ContextMessage, GroupContexts};
use crate::group::model::{ALL_GROUPS_ID, GroupInfo};
use crate::store::{KeyValueStorage, StateCodec, Store, Subscription};

/// Storage key of the group catalog.
pub const CATALOG_STORE_NAME: &str = "catalog";

/// Maximum number of groups, the default group included.
pub const MAX_GROUPS: usize = 6;

/// Display name of the seeded default group.
pub const DEFAULT_GROUP_NAME: &str = "All Members";

/// Built-in bots and their display names, in default group order.
pub const BUILTIN_BOTS: &[(&str, &str)] = &[
    ("chatgpt", "ChatGPT"),
    ("claude", "Claude"),
    ("grok", "Grok"),
    ("gemini", "Gemini"),
    ("glm", "GLM"),
    ("kimi", "Kimi"),
    ("minimax", "MiniMax"),
    ("qwen", "Qwen"),
    ("deepseek", "DeepSeek"),
    ("seed", "Seed"),
];

/// Display name for a bot id. Unknown bots display as their id.
pub fn bot_display_name(bot: &str) -> String {
    BUILTIN_BOTS
        .iter()
        .find(|(id, _)| *id == bot)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| bot.to_string())
}

fn build_group(
    id: String,
    name: String,
    bots: Vec<String>,
    is_default: bool,
    created_at: String,
) -> GroupInfo {
    GroupInfo {
        id,
        name,
        bot_names: bots.iter().map(|b| bot_display_name(b)).collect(),
        bot_count: bots.len(),
        bots,
        is_default,
        created_at,
    }
}

/// Persisted catalog content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogState {
    pub groups: Vec<GroupInfo>,
}

impl CatalogState {
    /// A catalog holding only the default group with every built-in bot.
    pub fn seeded(now: DateTime<Local>) -> Self {
        let bots = BUILTIN_BOTS.iter().map(|(id, _)| id.to_string()).collect();
        Self {
            groups: vec![build_group(
                ALL_GROUPS_ID.to_string(),
                DEFAULT_GROUP_NAME.to_string(),
                bots,
                true,
                now.to_rfc3339(),
            )],
        }
    }

    pub fn get(&self, group_id: &str) -> Option<&GroupInfo> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Adds a new group at the front of the catalog.
    ///
    /// The id is `grp_<unix millis>`, bumped by one millisecond while it
    /// collides with an existing id.
    pub fn create_group(
        &mut self,
        name: &str,
        bots: Vec<String>,
        now: DateTime<Local>,
    ) -> Result<GroupInfo> {
        if self.groups.len() >= MAX_GROUPS {
            return Err(StoreError::CatalogFull { max: MAX_GROUPS });
        }
        self.ensure_unique_name(name, None)?;

        let mut millis = now.timestamp_millis();
        while self.get(&format!("grp_{}", millis)).is_some() {
            millis += 1;
        }

        let group = build_group(
            format!("grp_{}", millis),
            name.to_string(),
            bots,
            false,
            now.to_rfc3339(),
        );
        self.groups.insert(0, group.clone());
        Ok(group)
    }

    /// Renames a group and replaces its bots.
    pub fn update_group(&mut self, group_id: &str, name: &str, bots: Vec<String>) -> Result<GroupInfo> {
        let index = self.editable_index(group_id)?;
        self.ensure_unique_name(name, Some(group_id))?;

        let existing = &self.groups[index];
        let updated = build_group(
            existing.id.clone(),
            name.to_string(),
            bots,
            existing.is_default,
            existing.created_at.clone(),
        );
        self.groups[index] = updated.clone();
        Ok(updated)
    }

    pub fn delete_group(&mut self, group_id: &str) -> Result<GroupInfo> {
        let index = self.editable_index(group_id)?;
        Ok(self.groups.remove(index))
    }

    fn editable_index(&self, group_id: &str) -> Result<usize> {
        let index = self
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| StoreError::not_found("group", group_id))?;

        if self.groups[index].is_default {
            return Err(StoreError::DefaultGroupReadOnly(group_id.to_string()));
        }
        Ok(index)
    }

    fn ensure_unique_name(&self, name: &str, except_id: Option<&str>) -> Result<()> {
        let taken = self
            .groups
            .iter()
            .any(|g| g.name == name && Some(g.id.as_str()) != except_id);
        if taken {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

/// Persisted group catalog.
pub struct GroupCatalog {
    store: Store<CatalogState>,
    contexts: GroupContexts,
}

impl GroupCatalog {
    /// Opens the catalog, seeding it with the default group on first use.
    ///
    /// A freshly seeded catalog is written to storage right away.
    pub fn open(
        storage: Arc<dyn KeyValueStorage>,
        codec: Arc<dyn StateCodec<CatalogState>>,
        contexts: GroupContexts,
    ) -> Result<Self> {
        let first_use = storage.get(CATALOG_STORE_NAME)?.is_none();
        let store = Store::open(
            CATALOG_STORE_NAME,
            storage,
            codec,
            CatalogState::seeded(Local::now()),
        )?;

        if first_use {
            store.save()?;
            info!(store = store.name(), "Seeded group catalog with the default group");
        }

        Ok(Self { store, contexts })
    }

    pub fn list(&self) -> Vec<GroupInfo> {
        self.store.read(|state| state.groups.clone())
    }

    pub fn get_group(&self, group_id: &str) -> Option<GroupInfo> {
        self.store.read(|state| state.get(group_id).cloned())
    }

    /// Creates a group and initialises its empty context.
    pub fn create_group(&self, name: &str, bots: Vec<String>) -> Result<GroupInfo> {
        let group = self
            .store
            .try_update(|state| state.create_group(name, bots, Local::now()))?;
        info!("Created group {} ({})", group.id, group.name);

        self.contexts.init(&group.id)?;
        Ok(group)
    }

    /// Updates a group. Bots that join the group start with a clean context
    /// in it.
    pub fn update_group(&self, group_id: &str, name: &str, bots: Vec<String>) -> Result<GroupInfo> {
        let (previous_bots, group) = self.store.try_update(|state| {
            let previous_bots = state
                .get(group_id)
                .map(|g| g.bots.clone())
                .unwrap_or_default();
            let group = state.update_group(group_id, name, bots)?;
            Ok((previous_bots, group))
        })?;
        info!("Updated group {} ({})", group.id, group.name);

        let added: BTreeSet<&String> = group
            .bots
            .iter()
            .filter(|bot| !previous_bots.contains(bot))
            .collect();
        for bot in added {
            self.contexts.clear_bot(&group.id, bot)?;
        }
        Ok(group)
    }

    /// Deletes a group together with its context.
    pub fn delete_group(&self, group_id: &str) -> Result<GroupInfo> {
        let group = self
            .store
            .try_update(|state| state.delete_group(group_id))?;
        info!("Deleted group {} ({})", group.id, group.name);

        self.contexts.remove(&group.id)?;
        Ok(group)
    }

    pub fn contexts(&self) -> &GroupContexts {
        &self.contexts
    }

    /// Histories of `bots` gathered across every catalog group, in catalog
    /// order.
    pub fn bots_context(&self, bots: &[String]) -> Result<BTreeMap<String, Vec<ContextMessage>>> {
        let group_ids: Vec<String> = self.store.read(|state| {
            state.groups.iter().map(|g| g.id.clone()).collect()
        });
        self.contexts.collect(&group_ids, bots)
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CatalogState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }
}
