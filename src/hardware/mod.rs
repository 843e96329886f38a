/// ハードウェア制御モジュール
pub mod button;
pub mod camera;
pub mod led;
#[cfg(not(target_os = "espidf"))]
pub mod mock;
pub mod storage;

pub use button::{ButtonError, TriggerButton};
pub use camera::CameraPins;
pub use led::{LedError, StatusLed};
pub use storage::FsStorage;
