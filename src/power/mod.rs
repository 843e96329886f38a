/// 電源管理モジュール
pub mod deep_sleep;

pub use deep_sleep::{DeepSleep, DeepSleepError, DeepSleepPlatform};
#[cfg(target_os = "espidf")]
pub use deep_sleep::{hold_pin_level, release_held_pins, EspIdfDeepSleep};
