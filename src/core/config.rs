use crate::core::capture_config::{CaptureConfig, Resolution};
use crate::core::config_validation::{
    parse_blink_half_period_ms, parse_camera_warmup_frames, parse_fb_count, parse_frame_size,
    parse_jpeg_quality, parse_sd_speed_hz, parse_xclk_freq_hz, ValidationError,
};
use crate::hardware::camera::CameraPins;

/// アプリケーション設定
///
/// この構造体はビルド時に`cfg.toml`ファイルから読み込まれた設定を保持します。
/// 実行時に変更できるパラメータはありません。
#[toml_cfg::toml_config]
pub struct Config {
    #[default(16_000_000)] // SD SPI 16MHz (既定の 4MHz より書き込みが速い)
    sd_speed_hz: u32,

    #[default(20_000_000)]
    xclk_freq_hz: u32,

    #[default("UXGA")]
    frame_size: &'static str,

    #[default(4)]
    jpeg_quality: u8,

    #[default(1)]
    fb_count: u8,

    #[default(1)] // OV2640 は1フレームで黒いバッファが抜ける
    camera_warmup_frames: u8,

    #[default(20)]
    warmup_settle_ms: u32,

    #[default(50)]
    complete_hold_ms: u32,

    #[default(20)]
    blink_half_period_ms: u32,

    #[default(50)]
    button_debounce_ms: u32,

    #[default(true)]
    deep_sleep_enabled: bool,
}

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("sd_speed_hz の値が範囲外です (400kHz-40MHz): {0}")]
    InvalidSdSpeed(u32),
    #[error("xclk_freq_hz の値が範囲外です (6MHz-27MHz): {0}")]
    InvalidXclkFrequency(u32),
    #[error("frame_size が不明です: {0}")]
    UnknownFrameSize(String),
    #[error("jpeg_quality の値が無効です (0-63): {0}")]
    InvalidJpegQuality(u8),
    #[error("fb_count の値が無効です (1-3): {0}")]
    InvalidFbCount(u8),
    #[error("camera_warmup_frames の値が無効です (0-10): {0}")]
    InvalidCameraWarmupFrames(u8),
    #[error("blink_half_period_ms は 1 以上を指定してください: {0}")]
    InvalidBlinkHalfPeriod(u32),
}

impl From<ValidationError> for ConfigError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::InvalidSdSpeed(v) => ConfigError::InvalidSdSpeed(v),
            ValidationError::InvalidXclkFrequency(v) => ConfigError::InvalidXclkFrequency(v),
            ValidationError::UnknownFrameSize(v) => ConfigError::UnknownFrameSize(v),
            ValidationError::InvalidJpegQuality(v) => ConfigError::InvalidJpegQuality(v),
            ValidationError::InvalidFbCount(v) => ConfigError::InvalidFbCount(v),
            ValidationError::InvalidCameraWarmupFrames(v) => {
                ConfigError::InvalidCameraWarmupFrames(v)
            }
            ValidationError::InvalidBlinkHalfPeriod(v) => ConfigError::InvalidBlinkHalfPeriod(v),
        }
    }
}

/// アプリケーション設定を表す構造体
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SDカード SPI クロック (Hz)
    pub sd_speed_hz: u32,

    /// カメラ XCLK (Hz)
    pub xclk_freq_hz: u32,

    /// フレームサイズ
    pub frame_size: Resolution,

    /// JPEG品質 (0-63)
    pub jpeg_quality: u8,

    /// フレームバッファ数
    pub fb_count: u8,

    /// カメラウォームアップフレーム数
    pub camera_warmup_frames: u8,

    /// ウォームアップ後の安定待ち (ms)
    pub warmup_settle_ms: u32,

    /// 撮影完了表示からカメラ停止までの待機 (ms)
    pub complete_hold_ms: u32,

    /// エラー点滅の半周期 (ms)
    pub blink_half_period_ms: u32,

    /// ボタンのチャタリング除去時間 (ms)
    pub button_debounce_ms: u32,

    /// 撮影後に Deep Sleep へ入るか
    pub deep_sleep_enabled: bool,
}

impl AppConfig {
    /// 設定ファイルから設定をロードします
    pub fn load() -> Result<Self, ConfigError> {
        // toml_cfg によって生成された定数
        Self::from_config(&CONFIG)
    }

    fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(AppConfig {
            sd_speed_hz: parse_sd_speed_hz(config.sd_speed_hz)?,
            xclk_freq_hz: parse_xclk_freq_hz(config.xclk_freq_hz)?,
            frame_size: parse_frame_size(config.frame_size)?,
            jpeg_quality: parse_jpeg_quality(config.jpeg_quality)?,
            fb_count: parse_fb_count(config.fb_count)?,
            camera_warmup_frames: parse_camera_warmup_frames(config.camera_warmup_frames)?,
            warmup_settle_ms: config.warmup_settle_ms,
            complete_hold_ms: config.complete_hold_ms,
            blink_half_period_ms: parse_blink_half_period_ms(config.blink_half_period_ms)?,
            button_debounce_ms: config.button_debounce_ms,
            deep_sleep_enabled: config.deep_sleep_enabled,
        })
    }

    /// 撮影シーケンス用の固定設定を構築します
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            pins: CameraPins::xiao_esp32s3(),
            xclk_freq_hz: self.xclk_freq_hz,
            resolution: self.frame_size,
            jpeg_quality: self.jpeg_quality,
            fb_count: self.fb_count,
            warmup_frames: self.camera_warmup_frames,
            warmup_settle_ms: self.warmup_settle_ms,
            sd_speed_hz: self.sd_speed_hz,
            complete_hold_ms: self.complete_hold_ms,
            blink_half_period_ms: self.blink_half_period_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        Config {
            sd_speed_hz: 16_000_000,
            xclk_freq_hz: 20_000_000,
            frame_size: "UXGA",
            jpeg_quality: 4,
            fb_count: 1,
            camera_warmup_frames: 1,
            warmup_settle_ms: 20,
            complete_hold_ms: 50,
            blink_half_period_ms: 20,
            button_debounce_ms: 50,
            deep_sleep_enabled: true,
        }
    }

    #[test]
    fn test_defaults_build_default_capture_profile() {
        let app_config = AppConfig::from_config(&default_config()).unwrap();

        assert_eq!(app_config.capture_config(), CaptureConfig::default());
        assert!(app_config.deep_sleep_enabled);
    }

    #[test]
    fn test_invalid_frame_size_is_rejected() {
        let config = Config {
            frame_size: "8K",
            ..default_config()
        };

        let result = AppConfig::from_config(&config);
        assert!(matches!(result, Err(ConfigError::UnknownFrameSize(ref s)) if s == "8K"));
    }

    #[test]
    fn test_invalid_sd_speed_is_rejected() {
        let config = Config {
            sd_speed_hz: 100,
            ..default_config()
        };

        assert!(matches!(
            AppConfig::from_config(&config),
            Err(ConfigError::InvalidSdSpeed(100))
        ));
    }

    #[test]
    fn test_invalid_warmup_frames_is_rejected() {
        let config = Config {
            camera_warmup_frames: 30,
            ..default_config()
        };

        assert!(matches!(
            AppConfig::from_config(&config),
            Err(ConfigError::InvalidCameraWarmupFrames(30))
        ));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error = ConfigError::from(ValidationError::InvalidJpegQuality(99));
        assert!(error.to_string().contains("jpeg_quality"));
    }
}
