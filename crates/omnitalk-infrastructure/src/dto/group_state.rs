//! GroupState and catalog DTOs
//!
//! ## Version History
//! - **1.0.0**: Initial schema. Group records use snake_case keys as delivered
//!   by the group service; the group store itself uses camelCase.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use omnitalk_core::error::{Result, StoreError};
use omnitalk_core::group::{CatalogState, GroupInfo, GroupState};

// ============================================================================
// GroupInfo DTO
// ============================================================================

/// Group record DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupInfoV1_0_0 {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bots: Vec<String>,
    #[serde(default)]
    pub bot_names: Vec<String>,
    #[serde(default)]
    pub bot_count: usize,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_at: String,
}

impl From<GroupInfoV1_0_0> for GroupInfo {
    fn from(dto: GroupInfoV1_0_0) -> Self {
        GroupInfo {
            id: dto.id,
            name: dto.name,
            bots: dto.bots,
            bot_names: dto.bot_names,
            bot_count: dto.bot_count,
            is_default: dto.is_default,
            created_at: dto.created_at,
        }
    }
}

impl From<GroupInfo> for GroupInfoV1_0_0 {
    fn from(group: GroupInfo) -> Self {
        GroupInfoV1_0_0 {
            id: group.id,
            name: group.name,
            bots: group.bots,
            bot_names: group.bot_names,
            bot_count: group.bot_count,
            is_default: group.is_default,
            created_at: group.created_at,
        }
    }
}

// ============================================================================
// GroupState DTOs
// ============================================================================

/// Group store DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct GroupStateV1_0_0 {
    #[serde(default)]
    pub groups: Vec<GroupInfoV1_0_0>,
    pub current_group_id: String,
}

impl IntoDomain<GroupState> for GroupStateV1_0_0 {
    fn into_domain(self) -> GroupState {
        GroupState {
            groups: self.groups.into_iter().map(Into::into).collect(),
            current_group_id: self.current_group_id,
        }
    }
}

impl FromDomain<GroupState> for GroupStateV1_0_0 {
    fn from_domain(state: GroupState) -> Self {
        GroupStateV1_0_0 {
            groups: state.groups.into_iter().map(Into::into).collect(),
            current_group_id: state.current_group_id,
        }
    }
}

// ============================================================================
// CatalogState DTOs
// ============================================================================

/// Group catalog DTO V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct CatalogStateV1_0_0 {
    #[serde(default)]
    pub groups: Vec<GroupInfoV1_0_0>,
}

impl IntoDomain<CatalogState> for CatalogStateV1_0_0 {
    fn into_domain(self) -> CatalogState {
        CatalogState {
            groups: self.groups.into_iter().map(Into::into).collect(),
        }
    }
}

impl FromDomain<CatalogState> for CatalogStateV1_0_0 {
    fn from_domain(state: CatalogState) -> Self {
        CatalogStateV1_0_0 {
            groups: state.groups.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Migrator factories
// ============================================================================

/// Creates a Migrator for GroupState entities.
pub fn create_group_state_migrator() -> Result<version_migrate::Migrator> {
    version_migrate::migrator!("group" => [GroupStateV1_0_0, GroupState], save = true)
        .map_err(|e| StoreError::migration(format!("Failed to create group migrator: {}", e)))
}

/// Creates a Migrator for CatalogState entities.
pub fn create_catalog_migrator() -> Result<version_migrate::Migrator> {
    version_migrate::migrator!("catalog" => [CatalogStateV1_0_0, CatalogState], save = true)
        .map_err(|e| StoreError::migration(format!("Failed to create catalog migrator: {}", e)))
}
