//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of each persisted store blob. They
//! are private to the infrastructure layer and handle the evolution of the
//! storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions or narrowed types that
//!   can be migrated without loss
//! - **PATCH (1.0.X)**: Not used for schema
//!
//! Blobs are stored in the flat format: the `version` key sits next to the
//! entity fields.

mod config_state;
mod group_context;
mod group_state;

pub use config_state::{ConfigStateV1_0_0, ConfigStateV1_1_0, create_config_state_migrator};
pub use group_context::{
    ContextMessageV1_0_0, GROUP_CONTEXT_ENTITY, GroupContextV1_0_0, create_group_context_migrator,
};
pub use group_state::{
    CatalogStateV1_0_0, GroupInfoV1_0_0, GroupStateV1_0_0, create_catalog_migrator,
    create_group_state_migrator,
};
