//! Chat groups: the group store, the catalog that feeds it and the per-group
//! conversation context.

pub mod catalog;
pub mod context;
pub mod model;
pub mod store;

pub use catalog::{CATALOG_STORE_NAME, CatalogState, GroupCatalog, MAX_GROUPS};
pub use context::{CONTEXT_KEY_PREFIX, ContextMessage, GroupContext, GroupContexts, context_key};
pub use model::{ALL_GROUPS_ID, GroupInfo, GroupState, SelectionOutcome};
pub use store::{GROUP_STORE_NAME, GroupStore};
