use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::debug;

/// ボタン状態のポーリング間隔 (ms)
pub const POLL_INTERVAL_MS: u32 = 10;

/// ボタン関連のエラー
#[derive(Debug, thiserror::Error)]
pub enum ButtonError {
    #[error("ボタンの読み取りに失敗しました: {0}")]
    ReadFailed(String),
}

/// 撮影トリガーボタン (プルアップ・押下で Low)
pub struct TriggerButton<P: InputPin> {
    pin: P,
    debounce_ms: u32,
}

impl<P: InputPin> TriggerButton<P> {
    pub fn new(pin: P, debounce_ms: u32) -> Self {
        Self { pin, debounce_ms }
    }

    pub fn is_pressed(&mut self) -> Result<bool, ButtonError> {
        self.pin
            .is_low()
            .map_err(|e| ButtonError::ReadFailed(format!("{:?}", e)))
    }

    /// 押下されて離されるまで待つ
    ///
    /// Low を検出したらチャタリング除去時間だけ待って再確認し、
    /// まだ Low なら離されるのを待ってから戻ります。
    pub fn wait_for_press<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), ButtonError> {
        loop {
            if !self.is_pressed()? {
                delay.delay_ms(POLL_INTERVAL_MS);
                continue;
            }

            delay.delay_ms(self.debounce_ms);
            if !self.is_pressed()? {
                debug!("チャタリングを無視しました");
                continue;
            }

            while self.is_pressed()? {
                delay.delay_ms(POLL_INTERVAL_MS);
            }
            delay.delay_ms(self.debounce_ms);
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{MockInputPin, RecordingDelay};

    #[test]
    fn test_is_pressed_is_active_low() {
        let mut button = TriggerButton::new(MockInputPin::with_low_levels(vec![true, false]), 50);

        assert!(button.is_pressed().unwrap());
        assert!(!button.is_pressed().unwrap());
    }

    #[test]
    fn test_wait_for_press_returns_after_release() {
        let pin = MockInputPin::with_low_levels(vec![false, false, true, true, false]);
        let mut button = TriggerButton::new(pin.clone(), 50);
        let mut delay = RecordingDelay::new();

        button.wait_for_press(&mut delay).unwrap();

        assert_eq!(delay.delays_ms(), vec![10, 10, 50, 50]);
        assert_eq!(pin.reads(), 5);
    }

    #[test]
    fn test_short_glitch_is_ignored() {
        // 1回目の Low はデバウンス後に High に戻っている
        let pin = MockInputPin::with_low_levels(vec![true, false, false, true, true, false]);
        let mut button = TriggerButton::new(pin.clone(), 50);
        let mut delay = RecordingDelay::new();

        button.wait_for_press(&mut delay).unwrap();

        assert_eq!(delay.delays_ms(), vec![50, 10, 50, 50]);
        assert_eq!(pin.reads(), 6);
    }
}
