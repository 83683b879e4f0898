pub mod codec;
pub mod dto;
pub mod paths;
pub mod settings;
pub mod storage;
pub mod stores;

pub use crate::codec::MigratingCodec;
pub use crate::settings::Settings;
pub use crate::storage::FileStorage;
pub use crate::stores::StoreSet;
