//! Per-group conversation context.
//!
//! Each group keeps, per bot, the messages that bot has exchanged inside the
//! group. A group's context is persisted as one blob under
//! `context_<group_id>`. The [`GroupCatalog`](super::GroupCatalog) keeps these
//! blobs in step with group creation, membership changes and deletion.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::{KeyValueStorage, StateCodec};

/// Prefix of every context storage key.
pub const CONTEXT_KEY_PREFIX: &str = "context_";

/// Storage key of the context of `group_id`.
///
/// Group ids are restricted to ASCII letters, digits, `-` and `_`.
pub fn context_key(group_id: &str) -> Result<String> {
    let valid = !group_id.is_empty()
        && group_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(StoreError::config(format!(
            "Invalid group id for context key: '{}'",
            group_id
        )));
    }
    Ok(format!("{}{}", CONTEXT_KEY_PREFIX, group_id))
}

/// One message in a bot's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

impl ContextMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Context of one group: bot id to that bot's messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupContext {
    pub bots: BTreeMap<String, Vec<ContextMessage>>,
}

impl GroupContext {
    pub fn messages(&self, bot: &str) -> &[ContextMessage] {
        self.bots.get(bot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, bot: &str, message: ContextMessage) {
        self.bots.entry(bot.to_string()).or_default().push(message);
    }

    /// Drops the history of `bot`. Returns `true` if there was one.
    pub fn clear_bot(&mut self, bot: &str) -> bool {
        self.bots.remove(bot).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.bots.is_empty()
    }
}

/// Persisted contexts of all groups.
///
/// Read-modify-write operations on contexts run one at a time.
pub struct GroupContexts {
    storage: Arc<dyn KeyValueStorage>,
    codec: Arc<dyn StateCodec<GroupContext>>,
    commit: Mutex<()>,
}

impl GroupContexts {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        codec: Arc<dyn StateCodec<GroupContext>>,
    ) -> Self {
        Self {
            storage,
            codec,
            commit: Mutex::new(()),
        }
    }

    /// Context of `group_id`; empty if none was ever written.
    pub fn get(&self, group_id: &str) -> Result<GroupContext> {
        Ok(self.read(&context_key(group_id)?)?.unwrap_or_default())
    }

    /// Writes an empty context for `group_id` unless one exists.
    ///
    /// Returns `true` when a new context was written.
    pub fn init(&self, group_id: &str) -> Result<bool> {
        let key = context_key(group_id)?;
        let _commit = self.lock_commit();
        if self.storage.get(&key)?.is_some() {
            return Ok(false);
        }
        self.write(&key, &GroupContext::default())?;
        debug!(group_id, "Initialised group context");
        Ok(true)
    }

    /// Appends a message to `bot`'s history in `group_id`.
    pub fn append(&self, group_id: &str, bot: &str, message: ContextMessage) -> Result<()> {
        let key = context_key(group_id)?;
        let _commit = self.lock_commit();
        let mut context = self.read(&key)?.unwrap_or_default();
        context.push(bot, message);
        self.write(&key, &context)
    }

    /// Drops `bot`'s history in `group_id`. A group without context is left
    /// untouched.
    pub fn clear_bot(&self, group_id: &str, bot: &str) -> Result<()> {
        let key = context_key(group_id)?;
        let _commit = self.lock_commit();
        let Some(mut context) = self.read(&key)? else {
            return Ok(());
        };
        if context.clear_bot(bot) {
            debug!(group_id, bot, "Cleared bot context");
        }
        self.write(&key, &context)
    }

    /// Resets the context of `group_id` to empty.
    pub fn clear(&self, group_id: &str) -> Result<()> {
        let key = context_key(group_id)?;
        let _commit = self.lock_commit();
        self.write(&key, &GroupContext::default())
    }

    /// Deletes the stored context of `group_id`.
    pub fn remove(&self, group_id: &str) -> Result<()> {
        let key = context_key(group_id)?;
        let _commit = self.lock_commit();
        self.storage.remove(&key)
    }

    /// Concatenates the histories of `bots` across `group_ids`, in group order.
    ///
    /// Every requested bot appears in the result, with an empty history if no
    /// group has messages for it.
    pub fn collect(
        &self,
        group_ids: &[String],
        bots: &[String],
    ) -> Result<BTreeMap<String, Vec<ContextMessage>>> {
        let mut result: BTreeMap<String, Vec<ContextMessage>> =
            bots.iter().map(|bot| (bot.clone(), Vec::new())).collect();

        for group_id in group_ids {
            let context = self.get(group_id)?;
            for (bot, entry) in result.iter_mut() {
                if let Some(messages) = context.bots.get(bot) {
                    entry.extend(messages.iter().cloned());
                }
            }
        }
        Ok(result)
    }

    fn read(&self, key: &str) -> Result<Option<GroupContext>> {
        match self.storage.get(key)? {
            Some(blob) => Ok(Some(self.codec.decode(&blob)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, context: &GroupContext) -> Result<()> {
        let blob = self.codec.encode(context)?;
        self.storage.set(key, &blob)
    }

    fn lock_commit(&self) -> MutexGuard<'_, ()> {
        self.commit.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonCodec, MemoryStorage};

    fn contexts(storage: Arc<MemoryStorage>) -> GroupContexts {
        GroupContexts::new(storage, Arc::new(JsonCodec::<GroupContext>::new()))
    }

    #[test]
    fn test_context_key_validation() {
        assert_eq!(context_key("grp_1700").unwrap(), "context_grp_1700");
        assert!(context_key("").is_err());
        assert!(context_key("../etc").is_err());
    }

    #[test]
    fn test_missing_context_reads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let contexts = contexts(storage.clone());

        assert!(contexts.get("grp_1").unwrap().is_empty());
        contexts.clear_bot("grp_1", "claude").unwrap();
        assert!(storage.is_empty(), "clearing a missing context must not write");
    }

    #[test]
    fn test_init_only_writes_once() {
        let storage = Arc::new(MemoryStorage::new());
        let contexts = contexts(storage.clone());

        assert!(contexts.init("grp_1").unwrap());
        contexts
            .append("grp_1", "kimi", ContextMessage::new("user", "hi"))
            .unwrap();
        assert!(!contexts.init("grp_1").unwrap());
        assert_eq!(contexts.get("grp_1").unwrap().messages("kimi").len(), 1);
    }

    #[test]
    fn test_append_and_clear_bot() {
        let contexts = contexts(Arc::new(MemoryStorage::new()));
        contexts
            .append("grp_1", "claude", ContextMessage::new("user", "hello"))
            .unwrap();
        contexts
            .append("grp_1", "claude", ContextMessage::new("assistant", "hi there"))
            .unwrap();
        contexts
            .append("grp_1", "grok", ContextMessage::new("user", "yo"))
            .unwrap();

        let context = contexts.get("grp_1").unwrap();
        assert_eq!(context.messages("claude")[1].content, "hi there");

        contexts.clear_bot("grp_1", "claude").unwrap();
        let context = contexts.get("grp_1").unwrap();
        assert!(context.messages("claude").is_empty());
        assert_eq!(context.messages("grok").len(), 1);
    }

    #[test]
    fn test_clear_and_remove() {
        let storage = Arc::new(MemoryStorage::new());
        let contexts = contexts(storage.clone());
        contexts
            .append("grp_1", "qwen", ContextMessage::new("user", "ping"))
            .unwrap();

        contexts.clear("grp_1").unwrap();
        assert!(contexts.get("grp_1").unwrap().is_empty());
        assert!(storage.get("context_grp_1").unwrap().is_some());

        contexts.remove("grp_1").unwrap();
        assert!(storage.get("context_grp_1").unwrap().is_none());
    }

    #[test]
    fn test_collect_concatenates_in_group_order() {
        let contexts = contexts(Arc::new(MemoryStorage::new()));
        contexts
            .append("grp_a", "glm", ContextMessage::new("user", "first"))
            .unwrap();
        contexts
            .append("grp_b", "glm", ContextMessage::new("user", "second"))
            .unwrap();
        contexts
            .append("grp_b", "seed", ContextMessage::new("user", "other"))
            .unwrap();

        let groups = vec!["grp_a".to_string(), "grp_b".to_string()];
        let bots = vec!["glm".to_string(), "minimax".to_string()];
        let collected = contexts.collect(&groups, &bots).unwrap();

        let glm: Vec<_> = collected["glm"].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(glm, vec!["first", "second"]);
        assert!(collected["minimax"].is_empty());
        assert!(!collected.contains_key("seed"));
    }
}
