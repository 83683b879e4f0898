//! Chat group domain models.

use serde::{Deserialize, Serialize};

/// Reserved group id meaning "all groups" / no specific group selected.
pub const ALL_GROUPS_ID: &str = "grp_all";

/// A chat group: a named set of bots that receive the same messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Unique identifier, stable across sessions.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Member bot identifiers, in display order.
    pub bots: Vec<String>,
    /// Display names, parallel to `bots`.
    pub bot_names: Vec<String>,
    /// Expected to equal `bots.len()`.
    pub bot_count: usize,
    /// Marks the group that takes over an invalid selection.
    pub is_default: bool,
    /// Creation timestamp, opaque to the stores.
    pub created_at: String,
}

impl GroupInfo {
    /// Whether `bot_names` and `bot_count` agree with `bots`.
    ///
    /// Records coming from outside are not required to be consistent; the stores
    /// keep them as delivered.
    pub fn is_consistent(&self) -> bool {
        self.bot_names.len() == self.bots.len() && self.bot_count == self.bots.len()
    }
}

/// Outcome of the selection check performed by [`GroupState::set_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The current selection exists in the new list.
    Retained,
    /// The selection was invalid and moved to the default group with this id.
    Defaulted(String),
    /// The selection is invalid and there is no default group to fall back to.
    /// Holds the id that is left selected.
    Dangling(String),
}

/// Known chat groups plus the user's current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupState {
    pub groups: Vec<GroupInfo>,
    pub current_group_id: String,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            current_group_id: ALL_GROUPS_ID.to_string(),
        }
    }
}

impl GroupState {
    /// Replaces the group list and repairs the selection if needed.
    ///
    /// If no group matches `current_group_id`, the first group flagged
    /// `is_default` becomes the selection. Without such a group the selection is
    /// left untouched and reported as [`SelectionOutcome::Dangling`].
    pub fn set_groups(&mut self, groups: Vec<GroupInfo>) -> SelectionOutcome {
        self.groups = groups;

        if self.has_valid_selection() {
            return SelectionOutcome::Retained;
        }

        match self.groups.iter().find(|g| g.is_default) {
            Some(default_group) => {
                self.current_group_id = default_group.id.clone();
                SelectionOutcome::Defaulted(self.current_group_id.clone())
            }
            None => SelectionOutcome::Dangling(self.current_group_id.clone()),
        }
    }

    /// The group matching `current_group_id`, if any.
    pub fn current_group(&self) -> Option<&GroupInfo> {
        self.groups.iter().find(|g| g.id == self.current_group_id)
    }

    /// Bots of the current group, or an empty list if nothing matches.
    pub fn group_bots(&self) -> Vec<String> {
        self.current_group()
            .map(|g| g.bots.clone())
            .unwrap_or_default()
    }

    pub fn has_valid_selection(&self) -> bool {
        self.current_group().is_some()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::GroupInfo;

    pub fn group(id: &str, is_default: bool, bots: &[&str]) -> GroupInfo {
        GroupInfo {
            id: id.to_string(),
            name: format!("Group {}", id),
            bots: bots.iter().map(|b| b.to_string()).collect(),
            bot_names: bots.iter().map(|b| b.to_uppercase()).collect(),
            bot_count: bots.len(),
            is_default,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }
}
