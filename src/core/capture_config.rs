use crate::hardware::camera::CameraPins;

/// 解像度列挙型
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Resolution {
    QVGA, // 320x240
    VGA,  // 640x480
    SVGA, // 800x600
    XGA,  // 1024x768
    SXGA, // 1280x1024
    UXGA, // 1600x1200
}

impl Resolution {
    /// 設定ファイルの文字列から解像度を取得（大文字小文字を区別しない）
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "QVGA" => Some(Resolution::QVGA),
            "VGA" => Some(Resolution::VGA),
            "SVGA" => Some(Resolution::SVGA),
            "XGA" => Some(Resolution::XGA),
            "SXGA" => Some(Resolution::SXGA),
            "UXGA" => Some(Resolution::UXGA),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> (u16, u16) {
        match self {
            Resolution::QVGA => (320, 240),
            Resolution::VGA => (640, 480),
            Resolution::SVGA => (800, 600),
            Resolution::XGA => (1024, 768),
            Resolution::SXGA => (1280, 1024),
            Resolution::UXGA => (1600, 1200),
        }
    }
}

/// 撮影シーケンスの固定設定
///
/// 起動時に一度だけ構築し、`CaptureSequencer` に渡します。
/// ピクセルフォーマットは常に JPEG、フレームバッファは PSRAM に確保し、
/// バッファが空になるまで待ってから取得するモードで動作します。
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureConfig {
    pub pins: CameraPins,
    pub xclk_freq_hz: u32,
    pub resolution: Resolution,
    /// 0-63 (小さいほど高画質)
    pub jpeg_quality: u8,
    pub fb_count: u8,
    /// 撮影前に読み捨てるフレーム数
    pub warmup_frames: u8,
    pub warmup_settle_ms: u32,
    /// SDカードの SPI クロック
    pub sd_speed_hz: u32,
    /// 撮影完了表示後、カメラ停止までの待機時間
    pub complete_hold_ms: u32,
    pub blink_half_period_ms: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            pins: CameraPins::xiao_esp32s3(),
            xclk_freq_hz: 20_000_000,
            resolution: Resolution::UXGA,
            jpeg_quality: 4,
            fb_count: 1,
            warmup_frames: 1,
            warmup_settle_ms: 20,
            sd_speed_hz: 16_000_000,
            complete_hold_ms: 50,
            blink_half_period_ms: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_from_name() {
        assert_eq!(Resolution::from_name("UXGA"), Some(Resolution::UXGA));
        assert_eq!(Resolution::from_name("svga"), Some(Resolution::SVGA));
        assert_eq!(Resolution::from_name(" vga "), Some(Resolution::VGA));
        assert_eq!(Resolution::from_name("HD"), None);
        assert_eq!(Resolution::from_name(""), None);
    }

    #[test]
    fn test_default_profile() {
        let config = CaptureConfig::default();

        assert_eq!(config.xclk_freq_hz, 20_000_000);
        assert_eq!(config.resolution, Resolution::UXGA);
        assert_eq!(config.resolution.dimensions(), (1600, 1200));
        assert_eq!(config.jpeg_quality, 4);
        assert_eq!(config.fb_count, 1);
        assert_eq!(config.warmup_frames, 1);
        assert_eq!(config.sd_speed_hz, 16_000_000);
        assert_eq!(config.blink_half_period_ms, 20);
    }
}
