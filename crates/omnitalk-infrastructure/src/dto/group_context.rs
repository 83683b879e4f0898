//! GroupContext DTOs
//!
//! ## Version History
//! - **1.0.0**: Initial schema. `bots` maps a bot id to its message history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use omnitalk_core::error::{Result, StoreError};
use omnitalk_core::group::{ContextMessage, GroupContext};

/// Entity name shared by every per-group context blob.
pub const GROUP_CONTEXT_ENTITY: &str = "context";

/// Context message DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextMessageV1_0_0 {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Group context DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct GroupContextV1_0_0 {
    #[serde(default)]
    pub bots: BTreeMap<String, Vec<ContextMessageV1_0_0>>,
}

impl IntoDomain<GroupContext> for GroupContextV1_0_0 {
    fn into_domain(self) -> GroupContext {
        GroupContext {
            bots: self
                .bots
                .into_iter()
                .map(|(bot, messages)| {
                    let messages = messages
                        .into_iter()
                        .map(|m| ContextMessage::new(m.role, m.content))
                        .collect();
                    (bot, messages)
                })
                .collect(),
        }
    }
}

impl FromDomain<GroupContext> for GroupContextV1_0_0 {
    fn from_domain(context: GroupContext) -> Self {
        GroupContextV1_0_0 {
            bots: context
                .bots
                .into_iter()
                .map(|(bot, messages)| {
                    let messages = messages
                        .into_iter()
                        .map(|m| ContextMessageV1_0_0 {
                            role: m.role,
                            content: m.content,
                        })
                        .collect();
                    (bot, messages)
                })
                .collect(),
        }
    }
}

/// Creates a Migrator for GroupContext entities.
pub fn create_group_context_migrator() -> Result<version_migrate::Migrator> {
    version_migrate::migrator!("context" => [GroupContextV1_0_0, GroupContext], save = true)
        .map_err(|e| StoreError::migration(format!("Failed to create context migrator: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_group_context_v1_0() {
        let migrator = create_group_context_migrator().unwrap();
        let json = serde_json::json!({
            "version": "1.0.0",
            "bots": {
                "claude": [
                    { "role": "user", "content": "hello" },
                    { "role": "assistant", "content": "hi" }
                ],
                "kimi": []
            }
        });

        let context: GroupContext = migrator.load_flat_from(GROUP_CONTEXT_ENTITY, json).unwrap();
        assert_eq!(context.messages("claude")[1], ContextMessage::new("assistant", "hi"));
        assert!(context.messages("kimi").is_empty());
    }

    #[test]
    fn test_save_empty_context_is_versioned() {
        let migrator = create_group_context_migrator().unwrap();
        let json_str = migrator
            .save_domain_flat(GROUP_CONTEXT_ENTITY, GroupContext::default())
            .unwrap();

        assert!(json_str.contains("\"version\":\"1.0.0\""));
        assert!(json_str.contains("\"bots\":{}"));
    }
}
