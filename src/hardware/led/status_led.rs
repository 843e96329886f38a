use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// LEDの制御に関するエラー
#[derive(Debug, thiserror::Error)]
pub enum LedError {
    #[error("LEDの初期化に失敗しました: {0}")]
    InitFailed(String),

    #[error("LEDの点灯制御に失敗しました: {0}")]
    ControlFailed(String),
}

/// ステータスLED制御
///
/// 外付けLEDはアクティブLow (Low = 点灯) で接続されています。
pub struct StatusLed<P: OutputPin> {
    led: P,
}

impl<P: OutputPin> StatusLed<P> {
    /// 新しいステータスLEDコントローラーを作成します
    ///
    /// # 引数
    ///
    /// * `pin` - 出力に設定済みのGPIO
    pub fn new(pin: P) -> Self {
        Self { led: pin }
    }

    /// LEDを点灯させます
    ///
    /// # エラー
    ///
    /// LED制御に失敗した場合にエラーを返します
    pub fn turn_on(&mut self) -> Result<(), LedError> {
        self.led
            .set_low()
            .map_err(|e| LedError::ControlFailed(format!("{:?}", e)))
    }

    /// LEDを消灯させます
    ///
    /// # エラー
    ///
    /// LED制御に失敗した場合にエラーを返します
    pub fn turn_off(&mut self) -> Result<(), LedError> {
        self.led
            .set_high()
            .map_err(|e| LedError::ControlFailed(format!("{:?}", e)))
    }

    /// 指定回数点滅させる
    ///
    /// # パターン
    /// 各点滅: `half_period_ms` ON + `half_period_ms` OFF (終了時は消灯)
    pub fn blink_count<D: DelayNs>(
        &mut self,
        count: u8,
        half_period_ms: u32,
        delay: &mut D,
    ) -> Result<(), LedError> {
        for _ in 0..count {
            self.turn_on()?;
            delay.delay_ms(half_period_ms);
            self.turn_off()?;
            delay.delay_ms(half_period_ms);
        }
        Ok(())
    }
}

#[cfg(target_os = "espidf")]
impl<T> StatusLed<esp_idf_svc::hal::gpio::PinDriver<'static, T, esp_idf_svc::hal::gpio::Output>>
where
    T: esp_idf_svc::hal::gpio::OutputPin,
{
    /// GPIOからステータスLEDを作成します
    ///
    /// # エラー
    ///
    /// LEDの初期化に失敗した場合にエラーを返します
    pub fn from_gpio(pin: T) -> Result<Self, LedError> {
        let led = esp_idf_svc::hal::gpio::PinDriver::output(pin)
            .map_err(|e| LedError::InitFailed(format!("{:?}", e)))?;

        Ok(Self::new(led))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{MockOutputPin, RecordingDelay};

    #[test]
    fn test_led_is_active_low() {
        let pin = MockOutputPin::new();
        let mut led = StatusLed::new(pin.clone());

        led.turn_on().unwrap();
        assert!(pin.is_low());
        led.turn_off().unwrap();
        assert!(!pin.is_low());
    }

    #[test]
    fn test_blink_count_pattern() {
        let pin = MockOutputPin::new();
        let mut led = StatusLed::new(pin.clone());
        let mut delay = RecordingDelay::new();

        led.blink_count(5, 20, &mut delay).unwrap();

        assert_eq!(pin.on_count(), 5);
        assert!(!pin.is_low());
        assert_eq!(delay.delays_ms(), vec![20; 10]);
    }

    #[test]
    fn test_blink_zero_times_does_nothing() {
        let pin = MockOutputPin::new();
        let mut led = StatusLed::new(pin.clone());
        let mut delay = RecordingDelay::new();

        led.blink_count(0, 20, &mut delay).unwrap();

        assert!(pin.levels().is_empty());
        assert!(delay.delays_ms().is_empty());
    }

    #[test]
    fn test_control_error_is_reported() {
        let pin = MockOutputPin::new();
        pin.set_fail(true);
        let mut led = StatusLed::new(pin);

        assert!(matches!(led.turn_on(), Err(LedError::ControlFailed(_))));
    }
}
