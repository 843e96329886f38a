/*!
 * # XIAO ESP32S3 SD Camera Library
 *
 * ボタン操作で JPEG を1枚撮影し、SDカードへ連番ファイルとして保存するためのライブラリ
 *
 * ## モジュール構成
 * - `core`: 撮影シーケンス、ファイル命名、設定、結果通知
 * - `hardware`: ハードウェア制御（カメラ、LED、ボタン、SDカード）
 * - `power`: 電源管理（ディープスリープ）
 */

// 公開モジュール
pub mod core;
pub mod hardware;
pub mod power;

// 内部で使用する型をまとめてエクスポート
pub use crate::core::{
    image_file_name, AppConfig, CaptureConfig, CaptureError, CaptureSequencer, CaptureSession,
    ConfigError, Resolution, SavedImage,
};
pub use hardware::led::status_led::{LedError, StatusLed};
pub use hardware::{CameraPins, FsStorage, TriggerButton};

/// ライブラリのバージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
