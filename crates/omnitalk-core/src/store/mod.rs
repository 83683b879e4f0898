//! Persisted, observable state containers.
//!
//! [`Store`] is the building block behind the configuration and group stores:
//! an explicit state holder that restores itself from a [`KeyValueStorage`] on
//! open, writes itself back after every mutation and notifies subscribers.

mod container;
mod storage;

pub use container::{Listener, Store, Subscription};
pub use storage::{JsonCodec, KeyValueStorage, MemoryStorage, StateCodec};
