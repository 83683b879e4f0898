//! Session configuration: interaction mode, credential and display name.

pub mod model;
pub mod store;

pub use model::{ConfigState, DEFAULT_MODE, DEFAULT_USERNAME, Mode};
pub use store::{CONFIG_STORE_NAME, ConfigStore};
