pub mod config;
pub mod error;
pub mod group;
pub mod store;

// Re-export common error type
pub use error::StoreError;
