/// XIAO ESP32S3 Sense カメラモジュール
///
/// - ボード固有のピン配置
/// - esp32-camera コンポーネントを使ったドライバ (実機のみ)

#[cfg(target_os = "espidf")]
pub mod controller;
pub mod xiao_esp32s3;

#[cfg(target_os = "espidf")]
pub use controller::{EspCamera, EspFrame};
#[cfg(target_os = "espidf")]
pub use xiao_esp32s3::reset_camera_pins;
pub use xiao_esp32s3::CameraPins;
