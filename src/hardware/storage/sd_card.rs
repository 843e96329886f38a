use esp_idf_svc::fs::fatfs::Fatfs;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin};
use esp_idf_svc::hal::sd::{spi::SdSpiHostDriver, SdCardConfiguration, SdCardDriver};
use esp_idf_svc::hal::spi::SpiDriver;
use esp_idf_svc::io::vfs::MountedFatfs;
use log::info;

use super::fs_storage::FsStorage;
use crate::core::drivers::{StorageDriver, StorageError};

type MountedSdCard =
    MountedFatfs<Fatfs<SdCardDriver<SdSpiHostDriver<'static, &'static SpiDriver<'static>>>>>;

/// SDカードのマウントポイント
pub const MOUNT_POINT: &str = "/sdcard";
const MAX_OPEN_FILES: usize = 4;

/// SPI接続のSDカード
///
/// 最初の `open` で FAT をマウントし、以降はマウントを維持します。
/// アンマウントは行いません。
pub struct SdCardStorage {
    spi: &'static SpiDriver<'static>,
    cs_pin: i32,
    mounted: Option<MountedSdCard>,
    files: FsStorage,
}

impl SdCardStorage {
    pub fn new(spi: &'static SpiDriver<'static>, cs_pin: i32) -> Self {
        Self {
            spi,
            cs_pin,
            mounted: None,
            files: FsStorage::new(MOUNT_POINT),
        }
    }

    fn mount(&self, speed_hz: u32) -> Result<MountedSdCard, esp_idf_svc::sys::EspError> {
        // SAFETY: CS ピンはこのドライバ専用に割り当てている
        let cs = unsafe { AnyOutputPin::new(self.cs_pin) };
        let host = SdSpiHostDriver::new(
            self.spi,
            Some(cs),
            AnyIOPin::none(),
            AnyIOPin::none(),
            AnyIOPin::none(),
            None,
        )?;

        let mut card_config = SdCardConfiguration::new();
        card_config.speed_khz = speed_hz / 1000;
        let card = SdCardDriver::new_spi(host, &card_config)?;

        MountedFatfs::mount(Fatfs::new_sdcard(0, card)?, MOUNT_POINT, MAX_OPEN_FILES)
    }
}

impl StorageDriver for SdCardStorage {
    type File = std::fs::File;

    fn open(&mut self, speed_hz: u32) -> Result<(), StorageError> {
        if self.mounted.is_none() {
            let mounted = self
                .mount(speed_hz)
                .map_err(|e| StorageError::OpenFailed(format!("{:?}", e)))?;
            self.mounted = Some(mounted);
            info!("✓ SDカードを {} にマウントしました", MOUNT_POINT);
        }
        self.files.open(speed_hz)
    }

    fn exists(&mut self, name: &str) -> bool {
        self.files.exists(name)
    }

    fn create(&mut self, name: &str) -> Result<std::fs::File, StorageError> {
        self.files.create(name)
    }
}
