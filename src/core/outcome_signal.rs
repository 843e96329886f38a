//! 撮影結果のLED表示
//!
//! エラーの種類を点滅回数に対応させます。シーケンス本体はLED点滅を行わず、
//! 結果の表示はここに集約しています。

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use super::capture_sequencer::{CaptureError, SavedImage};
use crate::hardware::led::{LedError, StatusLed};

/// ペリフェラル (SDカード / カメラ) 系の失敗
pub const PERIPHERAL_FAILURE_BLINKS: u8 = 5;
/// ファイル操作系の失敗
pub const FILE_FAILURE_BLINKS: u8 = 2;

pub fn failure_blink_count(error: &CaptureError) -> u8 {
    match error {
        CaptureError::StorageOpen(_)
        | CaptureError::CameraInit(_)
        | CaptureError::FrameUnavailable => PERIPHERAL_FAILURE_BLINKS,
        CaptureError::FileOpen(_) | CaptureError::FileWrite { .. } => FILE_FAILURE_BLINKS,
    }
}

/// 結果をLEDに表示する
///
/// 成功時は何もしません (完了時点で消灯済み)。失敗時は点滅後に消灯します。
pub fn signal_outcome<P, D>(
    led: &mut StatusLed<P>,
    delay: &mut D,
    result: &Result<SavedImage, CaptureError>,
    half_period_ms: u32,
) -> Result<(), LedError>
where
    P: OutputPin,
    D: DelayNs,
{
    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            led.blink_count(failure_blink_count(e), half_period_ms, delay)?;
            led.turn_off()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::drivers::{CameraError, StorageError};
    use crate::hardware::mock::{MockOutputPin, RecordingDelay};

    #[test]
    fn test_blink_counts_per_error_kind() {
        let storage = CaptureError::StorageOpen(StorageError::OpenFailed("no card".into()));
        let camera = CaptureError::CameraInit(CameraError::InitFailed("0x105".into()));
        let file_open = CaptureError::FileOpen(StorageError::CreateFailed {
            path: "image_001.jpg".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "fat error"),
        });
        let file_write = CaptureError::FileWrite {
            path: "image_001.jpg".into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };

        assert_eq!(failure_blink_count(&storage), 5);
        assert_eq!(failure_blink_count(&camera), 5);
        assert_eq!(failure_blink_count(&CaptureError::FrameUnavailable), 5);
        assert_eq!(failure_blink_count(&file_open), 2);
        assert_eq!(failure_blink_count(&file_write), 2);
    }

    #[test]
    fn test_success_leaves_led_untouched() {
        let pin = MockOutputPin::new();
        let mut led = StatusLed::new(pin.clone());
        let mut delay = RecordingDelay::new();
        let saved = SavedImage {
            file_name: "image_001.jpg".into(),
            index: 1,
            bytes: 100,
        };

        signal_outcome(&mut led, &mut delay, &Ok(saved), 20).unwrap();

        assert!(pin.levels().is_empty());
        assert!(delay.delays_ms().is_empty());
    }

    #[test]
    fn test_failure_blinks_then_turns_off() {
        let pin = MockOutputPin::new();
        let mut led = StatusLed::new(pin.clone());
        let mut delay = RecordingDelay::new();

        signal_outcome(&mut led, &mut delay, &Err(CaptureError::FrameUnavailable), 20).unwrap();

        assert_eq!(pin.on_count(), 5);
        assert!(!pin.is_low());
        assert_eq!(delay.total_ms(), 200);
    }
}
