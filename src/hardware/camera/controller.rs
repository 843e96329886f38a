use esp_idf_sys::camera::{
    camera_config_t, camera_fb_location_t_CAMERA_FB_IN_PSRAM, camera_fb_t,
    camera_grab_mode_t_CAMERA_GRAB_WHEN_EMPTY, esp_camera_deinit, esp_camera_fb_get,
    esp_camera_fb_return, esp_camera_init, framesize_t, framesize_t_FRAMESIZE_QVGA,
    framesize_t_FRAMESIZE_SVGA, framesize_t_FRAMESIZE_SXGA, framesize_t_FRAMESIZE_UXGA,
    framesize_t_FRAMESIZE_VGA, framesize_t_FRAMESIZE_XGA, ledc_channel_t_LEDC_CHANNEL_0,
    ledc_timer_t_LEDC_TIMER_0, pixformat_t_PIXFORMAT_JPEG,
};
use esp_idf_sys::{esp, gpio_mode_t_GPIO_MODE_OUTPUT, gpio_set_direction, gpio_set_level};
use log::{debug, info, warn};

use crate::core::capture_config::{CaptureConfig, Resolution};
use crate::core::drivers::{CameraDriver, CameraError, FrameBuffer};
use crate::hardware::camera::CameraPins;

fn frame_size_of(resolution: Resolution) -> framesize_t {
    match resolution {
        Resolution::QVGA => framesize_t_FRAMESIZE_QVGA,
        Resolution::VGA => framesize_t_FRAMESIZE_VGA,
        Resolution::SVGA => framesize_t_FRAMESIZE_SVGA,
        Resolution::XGA => framesize_t_FRAMESIZE_XGA,
        Resolution::SXGA => framesize_t_FRAMESIZE_SXGA,
        Resolution::UXGA => framesize_t_FRAMESIZE_UXGA,
    }
}

/// esp32-camera コンポーネントを直接扱うカメラドライバ
pub struct EspCamera {
    pins: CameraPins,
    initialized: bool,
}

impl EspCamera {
    pub fn new(pins: CameraPins) -> Self {
        Self {
            pins,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn build_config(config: &CaptureConfig) -> camera_config_t {
        let pins = &config.pins;
        let d = pins.data_pins;

        let mut camera_config = camera_config_t::default();
        camera_config.pin_pwdn = pins.pwdn_pin.unwrap_or(-1);
        camera_config.pin_reset = pins.reset_pin.unwrap_or(-1);
        camera_config.pin_xclk = pins.xclk_pin;
        camera_config.__bindgen_anon_1.pin_sccb_sda = pins.sda_pin;
        camera_config.__bindgen_anon_2.pin_sccb_scl = pins.scl_pin;
        camera_config.pin_d0 = d[0];
        camera_config.pin_d1 = d[1];
        camera_config.pin_d2 = d[2];
        camera_config.pin_d3 = d[3];
        camera_config.pin_d4 = d[4];
        camera_config.pin_d5 = d[5];
        camera_config.pin_d6 = d[6];
        camera_config.pin_d7 = d[7];
        camera_config.pin_vsync = pins.vsync_pin;
        camera_config.pin_href = pins.href_pin;
        camera_config.pin_pclk = pins.pclk_pin;

        camera_config.xclk_freq_hz = config.xclk_freq_hz as i32;
        camera_config.ledc_timer = ledc_timer_t_LEDC_TIMER_0;
        camera_config.ledc_channel = ledc_channel_t_LEDC_CHANNEL_0;
        camera_config.pixel_format = pixformat_t_PIXFORMAT_JPEG;
        camera_config.frame_size = frame_size_of(config.resolution);
        camera_config.jpeg_quality = i32::from(config.jpeg_quality);
        camera_config.fb_count = usize::from(config.fb_count);
        camera_config.fb_location = camera_fb_location_t_CAMERA_FB_IN_PSRAM;
        camera_config.grab_mode = camera_grab_mode_t_CAMERA_GRAB_WHEN_EMPTY;
        camera_config
    }

    fn set_pwdn(&self, level: u32) {
        if let Some(pin) = self.pins.pwdn_pin {
            unsafe {
                gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
                gpio_set_level(pin, level);
            }
        }
    }
}

impl CameraDriver for EspCamera {
    type Frame<'a> = EspFrame<'a>;

    fn init(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        self.pins = config.pins;
        // PWDN を解除してから初期化する
        self.set_pwdn(0);

        let camera_config = Self::build_config(config);
        esp!(unsafe { esp_camera_init(&camera_config) })
            .map_err(|e| CameraError::InitFailed(format!("esp_camera_init: {:?}", e)))?;

        self.initialized = true;
        info!(
            "✓ カメラ初期化完了 ({:?}, quality={}, fb_count={})",
            config.resolution, config.jpeg_quality, config.fb_count
        );
        Ok(())
    }

    fn capture(&mut self) -> Option<EspFrame<'_>> {
        if !self.initialized {
            warn!("カメラが初期化されていません");
            return None;
        }

        let fb = unsafe { esp_camera_fb_get() };
        if fb.is_null() {
            return None;
        }
        Some(EspFrame { fb, _camera: self })
    }

    fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        if let Err(e) = esp!(unsafe { esp_camera_deinit() }) {
            warn!("esp_camera_deinit に失敗しました: {:?}", e);
        }
        self.initialized = false;
        debug!("カメラを停止しました");
    }

    fn power_down(&mut self) {
        self.set_pwdn(1);
    }
}

/// ドライバから借用中のフレームバッファ
///
/// ドロップ時に `esp_camera_fb_return` で返却されます。
pub struct EspFrame<'a> {
    fb: *mut camera_fb_t,
    _camera: &'a EspCamera,
}

impl FrameBuffer for EspFrame<'_> {
    fn data(&self) -> &[u8] {
        // SAFETY: fb は返却されるまで有効で、buf は len バイトを指す
        unsafe {
            let fb = &*self.fb;
            if fb.buf.is_null() {
                &[]
            } else {
                std::slice::from_raw_parts(fb.buf, fb.len)
            }
        }
    }
}

impl Drop for EspFrame<'_> {
    fn drop(&mut self) {
        unsafe { esp_camera_fb_return(self.fb) };
    }
}
