/// ストレージ (SDカード) モジュール
pub mod fs_storage;
#[cfg(target_os = "espidf")]
pub mod sd_card;

pub use fs_storage::FsStorage;
#[cfg(target_os = "espidf")]
pub use sd_card::{SdCardStorage, MOUNT_POINT};
