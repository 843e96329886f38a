//! 撮影シーケンスが利用するペリフェラルのインターフェース
//!
//! 実機用 (ESP-IDF) とテスト用 (Mock) の実装を切り替えるためのトレイトです。

use std::io::Write;

use super::capture_config::CaptureConfig;

/// カメラドライバのエラー
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("カメラの初期化に失敗しました: {0}")]
    InitFailed(String),
}

/// ストレージドライバのエラー
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("ストレージを開けません: {0}")]
    OpenFailed(String),

    #[error("ファイルを作成できません ({path}): {source}")]
    CreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 取得したフレームバッファ
///
/// ドロップ時にドライバへ返却されるため、返却は必ず一度だけ行われます。
pub trait FrameBuffer {
    /// エンコード済み画像データ
    fn data(&self) -> &[u8];

    fn len(&self) -> usize {
        self.data().len()
    }

    fn is_empty(&self) -> bool {
        self.data().is_empty()
    }
}

/// カメラドライバ
pub trait CameraDriver {
    type Frame<'a>: FrameBuffer
    where
        Self: 'a;

    /// 固定設定でカメラを初期化する
    fn init(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// フレームを1枚取得する。バッファが無い場合は `None`
    fn capture(&mut self) -> Option<Self::Frame<'_>>;

    fn deinit(&mut self);

    /// PWDN ラインがあればアクティブにしてセンサーをスタンバイにする
    fn power_down(&mut self);
}

/// ストレージドライバ
pub trait StorageDriver {
    /// 書き込み用ファイルハンドル。ドロップでクローズされる
    type File: Write;

    /// 指定クロックでストレージを利用可能にする
    fn open(&mut self, speed_hz: u32) -> Result<(), StorageError>;

    fn exists(&mut self, name: &str) -> bool;

    /// 書き込み用にファイルを作成する (既存の場合は切り詰め)
    fn create(&mut self, name: &str) -> Result<Self::File, StorageError>;
}
