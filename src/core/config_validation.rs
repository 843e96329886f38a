use super::capture_config::Resolution;

pub const MIN_SD_SPEED_HZ: u32 = 400_000;
pub const MAX_SD_SPEED_HZ: u32 = 40_000_000;
pub const MAX_JPEG_QUALITY: u8 = 63;
pub const MAX_WARMUP_FRAMES: u8 = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidSdSpeed(u32),
    InvalidXclkFrequency(u32),
    UnknownFrameSize(String),
    InvalidJpegQuality(u8),
    InvalidFbCount(u8),
    InvalidCameraWarmupFrames(u8),
    InvalidBlinkHalfPeriod(u32),
}

pub fn parse_sd_speed_hz(value: u32) -> Result<u32, ValidationError> {
    if (MIN_SD_SPEED_HZ..=MAX_SD_SPEED_HZ).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidSdSpeed(value))
    }
}

pub fn parse_xclk_freq_hz(value: u32) -> Result<u32, ValidationError> {
    // OV2640 は 6MHz-27MHz
    if (6_000_000..=27_000_000).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidXclkFrequency(value))
    }
}

pub fn parse_frame_size(value: &str) -> Result<Resolution, ValidationError> {
    Resolution::from_name(value).ok_or_else(|| ValidationError::UnknownFrameSize(value.to_string()))
}

pub fn parse_jpeg_quality(value: u8) -> Result<u8, ValidationError> {
    if value <= MAX_JPEG_QUALITY {
        Ok(value)
    } else {
        Err(ValidationError::InvalidJpegQuality(value))
    }
}

pub fn parse_fb_count(value: u8) -> Result<u8, ValidationError> {
    if (1..=3).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidFbCount(value))
    }
}

pub fn parse_camera_warmup_frames(value: u8) -> Result<u8, ValidationError> {
    if value <= MAX_WARMUP_FRAMES {
        Ok(value)
    } else {
        Err(ValidationError::InvalidCameraWarmupFrames(value))
    }
}

pub fn parse_blink_half_period_ms(value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::InvalidBlinkHalfPeriod(value))
    } else {
        Ok(value)
    }
}
