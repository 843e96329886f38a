/// コアシステムモジュール
pub mod capture_config;
pub mod capture_sequencer;
pub mod capture_session;
pub mod config;
pub mod config_validation;
pub mod drivers;
pub mod file_naming;
pub mod outcome_signal;
#[cfg(target_os = "espidf")]
pub mod rtc_manager;

pub use capture_config::{CaptureConfig, Resolution};
pub use capture_sequencer::{CaptureError, CaptureSequencer, SavedImage};
pub use capture_session::CaptureSession;
pub use config::{AppConfig, ConfigError};
pub use drivers::{CameraDriver, CameraError, FrameBuffer, StorageDriver, StorageError};
pub use file_naming::{image_file_name, parse_image_index, resolve_next_file_name};
pub use outcome_signal::{failure_blink_count, signal_outcome};
#[cfg(target_os = "espidf")]
pub use rtc_manager::RtcManager;
