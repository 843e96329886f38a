#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::{
    delay::FreeRtos,
    gpio::{PinDriver, Pull},
    peripherals::Peripherals,
    spi::{config::DriverConfig, Dma, SpiDriver},
};
#[cfg(target_os = "espidf")]
use log::{error, info, warn};
#[cfg(target_os = "espidf")]
use xiao_sd_camera::{
    core::RtcManager,
    hardware::camera::{reset_camera_pins, EspCamera},
    hardware::storage::SdCardStorage,
    power::{hold_pin_level, release_held_pins, DeepSleep, EspIdfDeepSleep},
    AppConfig, CameraPins, CaptureSequencer, StatusLed, TriggerButton,
};

/// ステータスLED (Low で点灯)
#[cfg(target_os = "espidf")]
const LED_GPIO: i32 = 3;
/// 撮影ボタン (プルアップ、押下で Low、RTC IO)
#[cfg(target_os = "espidf")]
const BUTTON_GPIO: i32 = 2;
/// SDカード CS
#[cfg(target_os = "espidf")]
const SD_CS_GPIO: i32 = 21;

/// アプリケーションのメインエントリーポイント
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    // ESP-IDFの基本初期化
    esp_idf_sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    info!("=== XIAO ESP32S3 SD Camera v{} ===", xiao_sd_camera::VERSION);

    // スリープ中に固定されていたピンを解放
    let camera_pins = CameraPins::xiao_esp32s3();
    let mut held_pins = camera_pins.all_signal_pins().to_vec();
    held_pins.push(LED_GPIO);
    release_held_pins(&held_pins);
    info!("✓ スリープ解除に伴い全ピンの固定(Hold)を解除しました");

    // 設定ファイル読み込み
    let app_config = AppConfig::load().map_err(|e| {
        error!("設定ファイルの読み込みに失敗しました: {}", e);
        anyhow::anyhow!("設定ファイルの読み込みエラー: {}", e)
    })?;
    info!("✓ 設定読み込み完了: {:?}", app_config);

    info!("ペリフェラルを初期化しています");
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    let mut led = StatusLed::from_gpio(pins.gpio3)?;
    led.turn_off()?;

    let mut button_pin = PinDriver::input(pins.gpio2)?;
    button_pin.set_pull(Pull::Up)?;
    let mut button = TriggerButton::new(button_pin, app_config.button_debounce_ms);

    // SPI バスはプロセス終了まで保持する
    let spi = SpiDriver::new(
        peripherals.spi2,
        pins.gpio7,
        pins.gpio9,
        Some(pins.gpio8),
        &DriverConfig::default().dma(Dma::Auto(4096)),
    )?;
    let spi: &'static SpiDriver<'static> = Box::leak(Box::new(spi));
    let storage = SdCardStorage::new(spi, SD_CS_GPIO);
    let camera = EspCamera::new(camera_pins);

    let mut sequencer =
        CaptureSequencer::new(app_config.capture_config(), camera, storage, led, FreeRtos);
    let mut session = RtcManager::restore_session();

    if RtcManager::woke_by_button() {
        info!("ボタン押下で復帰しました。撮影を開始します");
        // 結果のログとLED表示は run 内で行う
        let _ = sequencer.run(&mut session);
    }

    let deep_sleep = DeepSleep::new(EspIdfDeepSleep);

    info!("=== 撮影待機ループを開始します ===");
    loop {
        if app_config.deep_sleep_enabled {
            RtcManager::persist_session(&session);
            hold_pin_level(LED_GPIO, 1);
            reset_camera_pins(&camera_pins);
            deep_sleep.sleep_until_button(BUTTON_GPIO)?;
            warn!("Deep Sleep から戻りました。ボタン待機に切り替えます");
        }

        button.wait_for_press(&mut FreeRtos)?;
        info!("ボタンが押されました。撮影を開始します");
        let _ = sequencer.run(&mut session);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    println!(
        "xiao_sd_camera v{} は ESP32-S3 (espidf) 向けのファームウェアです。ホストでは `cargo test` を実行してください。",
        xiao_sd_camera::VERSION
    );
}
