//! Storage layer for durable store blobs.

mod atomic_file;
mod file_storage;

pub use atomic_file::AtomicFile;
pub use file_storage::FileStorage;
