//! XIAO ESP32S3 Sense対応カメラピン設定
//!
//! OV2640 は DVP 8bit + SCCB(I2C) で接続されています。
//! PWDN / RESET ラインは基板上で配線されていないため `None` です。

/// カメラピン構造体 (GPIO番号)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraPins {
    pub data_pins: [i32; 8],
    pub xclk_pin: i32,
    pub pclk_pin: i32,
    pub vsync_pin: i32,
    pub href_pin: i32,
    pub sda_pin: i32,
    pub scl_pin: i32,
    pub pwdn_pin: Option<i32>,
    pub reset_pin: Option<i32>,
}

impl CameraPins {
    /// XIAO ESP32S3 Sense用カメラピン設定を取得
    pub const fn xiao_esp32s3() -> Self {
        Self {
            data_pins: [15, 17, 18, 16, 14, 12, 11, 48], // D0-D7 (Y2-Y9)
            xclk_pin: 10,
            pclk_pin: 13,
            vsync_pin: 38,
            href_pin: 47,
            sda_pin: 40,
            scl_pin: 39,
            pwdn_pin: None,
            reset_pin: None,
        }
    }

    /// XCLK/PCLK/VSYNC/HREF/SDA/SCL と D0-D7 の全GPIO
    pub fn all_signal_pins(&self) -> [i32; 14] {
        let d = self.data_pins;
        [
            self.xclk_pin,
            d[0],
            d[1],
            d[2],
            d[3],
            d[4],
            d[5],
            d[6],
            d[7],
            self.vsync_pin,
            self.href_pin,
            self.pclk_pin,
            self.sda_pin,
            self.scl_pin,
        ]
    }

    /// 信号ピンのビットマスク (gpio_config 用)
    pub fn signal_pin_mask(&self) -> u64 {
        self.all_signal_pins()
            .iter()
            .fold(0u64, |mask, &pin| mask | (1u64 << pin))
    }
}

impl Default for CameraPins {
    fn default() -> Self {
        Self::xiao_esp32s3()
    }
}

/// カメラ用全ピンをリセットし、Deep Sleep中のリーク電流を最小化する
///
/// 全てのカメラ関連ピンを入力(High-Z)にした後、XCLK と SDA/SCL のみ
/// Output Low に固定し、Hold を有効化します。
#[cfg(target_os = "espidf")]
pub fn reset_camera_pins(pins: &CameraPins) {
    use esp_idf_sys::{
        gpio_config, gpio_config_t, gpio_hold_en, gpio_int_type_t_GPIO_INTR_DISABLE,
        gpio_mode_t_GPIO_MODE_INPUT, gpio_mode_t_GPIO_MODE_OUTPUT,
        gpio_pulldown_t_GPIO_PULLDOWN_DISABLE, gpio_pullup_t_GPIO_PULLUP_DISABLE,
        gpio_set_direction, gpio_set_level,
    };

    log::info!("カメラピンのリセット（High-Z / Hold）を開始します...");

    let config = gpio_config_t {
        pin_bit_mask: pins.signal_pin_mask(),
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };

    unsafe {
        let err = gpio_config(&config);
        if err != 0 {
            log::error!("カメラピンのリセットに失敗しました: {}", err);
            return;
        }

        // XCLK はノイズでクロックが入らないよう Output Low
        // SDA/SCL はプルアップ経由のリーク電流を防ぐため Output Low
        for pin in [pins.xclk_pin, pins.sda_pin, pins.scl_pin] {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
            gpio_set_level(pin, 0);
        }

        for pin in pins.all_signal_pins() {
            gpio_hold_en(pin);
        }
    }

    log::info!("✓ カメラ用全ピンがHigh-Z・Hold状態にリセットされました");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_pin_configuration() {
        let pins = CameraPins::xiao_esp32s3();

        assert_eq!(pins.data_pins, [15, 17, 18, 16, 14, 12, 11, 48]);
        assert_eq!(pins.xclk_pin, 10);
        assert_eq!(pins.pclk_pin, 13);
        assert_eq!(pins.vsync_pin, 38);
        assert_eq!(pins.href_pin, 47);
        assert_eq!(pins.sda_pin, 40);
        assert_eq!(pins.scl_pin, 39);
        assert_eq!(pins.pwdn_pin, None);
        assert_eq!(pins.reset_pin, None);
    }

    #[test]
    fn test_signal_pin_mask_covers_every_pin() {
        let pins = CameraPins::xiao_esp32s3();
        let mask = pins.signal_pin_mask();

        assert_eq!(mask.count_ones(), 14);
        for pin in pins.all_signal_pins() {
            assert_ne!(mask & (1u64 << pin), 0, "GPIO{} がマスクに含まれていません", pin);
        }
    }
}
