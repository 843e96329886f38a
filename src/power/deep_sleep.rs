use log::info;

/// ESP32-S3 で RTC IO として使える GPIO の上限
pub const MAX_RTC_GPIO: i32 = 21;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DeepSleepError {
    #[error("GPIO{0} は RTC IO ではないため復帰ピンに使用できません (0-21)")]
    NotRtcCapable(i32),
}

/// Platform-agnostic deep-sleep abstraction.
pub trait DeepSleepPlatform {
    /// Enter deep sleep until the given RTC GPIO is pulled low.
    fn sleep_until_pin_low(&self, gpio: i32);
}

/// ESP-IDF specific deep sleep implementation (EXT0 wake-up).
#[cfg(target_os = "espidf")]
pub struct EspIdfDeepSleep;

#[cfg(target_os = "espidf")]
impl DeepSleepPlatform for EspIdfDeepSleep {
    fn sleep_until_pin_low(&self, gpio: i32) {
        unsafe {
            // スリープ中もボタンの High を保つため RTC 側のプルアップを有効化
            esp_idf_sys::rtc_gpio_pullup_en(gpio);
            esp_idf_sys::rtc_gpio_pulldown_dis(gpio);
            esp_idf_sys::esp_sleep_enable_ext0_wakeup(gpio, 0);

            info!("---[STARTING DEEP SLEEP]---");
            esp_idf_sys::esp_deep_sleep_start();

            // 通常、ここは実行されない
            log::error!("❌ esp_deep_sleep_start() から戻ってしまいました。OS再起動を実行します。");
            esp_idf_sys::esp_restart();
        }
    }
}

/// Deep sleep controller with platform abstraction.
pub struct DeepSleep<P: DeepSleepPlatform> {
    platform: P,
}

impl<P: DeepSleepPlatform> DeepSleep<P> {
    pub fn new(platform: P) -> Self {
        DeepSleep { platform }
    }

    /// ボタン (Low アクティブ) が押されるまで Deep Sleep します
    pub fn sleep_until_button(&self, gpio: i32) -> Result<(), DeepSleepError> {
        if !(0..=MAX_RTC_GPIO).contains(&gpio) {
            return Err(DeepSleepError::NotRtcCapable(gpio));
        }

        info!("GPIO{} の押下で復帰する Deep Sleep に入ります", gpio);
        self.platform.sleep_until_pin_low(gpio);
        Ok(())
    }
}

/// Deep Sleep 中に保持していたピンの Hold を解除する (起動直後に呼ぶ)
#[cfg(target_os = "espidf")]
pub fn release_held_pins(pins: &[i32]) {
    unsafe {
        for &pin in pins {
            esp_idf_sys::gpio_hold_dis(pin);
        }
        esp_idf_sys::gpio_deep_sleep_hold_dis();
    }
}

/// ピンを指定レベルに固定し、Deep Sleep 中も保持する
#[cfg(target_os = "espidf")]
pub fn hold_pin_level(pin: i32, level: u32) {
    unsafe {
        esp_idf_sys::gpio_set_level(pin, level);
        esp_idf_sys::gpio_hold_en(pin);
        esp_idf_sys::gpio_deep_sleep_hold_en();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockPlatform {
        wake_pins: RefCell<Vec<i32>>,
    }

    impl DeepSleepPlatform for &MockPlatform {
        fn sleep_until_pin_low(&self, gpio: i32) {
            self.wake_pins.borrow_mut().push(gpio);
        }
    }

    #[test]
    fn test_sleep_until_button_uses_platform() {
        let platform = MockPlatform::default();
        let sleep = DeepSleep::new(&platform);

        assert!(sleep.sleep_until_button(2).is_ok());
        assert_eq!(*platform.wake_pins.borrow(), vec![2]);
    }

    #[test]
    fn test_non_rtc_gpio_is_rejected() {
        let platform = MockPlatform::default();
        let sleep = DeepSleep::new(&platform);

        assert_eq!(
            sleep.sleep_until_button(38),
            Err(DeepSleepError::NotRtcCapable(38))
        );
        assert_eq!(sleep.sleep_until_button(-1), Err(DeepSleepError::NotRtcCapable(-1)));
        assert!(platform.wake_pins.borrow().is_empty());
    }

    #[test]
    fn test_rtc_gpio_bounds() {
        let platform = MockPlatform::default();
        let sleep = DeepSleep::new(&platform);

        assert!(sleep.sleep_until_button(0).is_ok());
        assert!(sleep.sleep_until_button(21).is_ok());
        assert!(sleep.sleep_until_button(22).is_err());
    }
}
