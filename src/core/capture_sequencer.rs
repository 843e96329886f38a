use std::io::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{error, info, warn};

use super::capture_config::CaptureConfig;
use super::capture_session::CaptureSession;
use super::drivers::{CameraDriver, CameraError, FrameBuffer, StorageDriver, StorageError};
use super::file_naming::resolve_next_file_name;
use super::outcome_signal::signal_outcome;
use crate::hardware::led::StatusLed;

/// 撮影の失敗理由
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("SDカードを開けませんでした: {0}")]
    StorageOpen(#[source] StorageError),

    #[error("カメラを初期化できませんでした: {0}")]
    CameraInit(#[source] CameraError),

    #[error("フレームバッファを取得できませんでした")]
    FrameUnavailable,

    #[error("書き込み用ファイルを開けませんでした: {0}")]
    FileOpen(#[source] StorageError),

    #[error("ファイルへの書き込みに失敗しました ({path}): {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 保存に成功した画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub file_name: String,
    pub index: u32,
    pub bytes: usize,
}

/// 初期化済みカメラ
///
/// スコープを抜けると必ず停止し、PWDN ラインを駆動します。
struct ActiveCamera<'c, C: CameraDriver> {
    camera: &'c mut C,
}

impl<'c, C: CameraDriver> ActiveCamera<'c, C> {
    fn start(camera: &'c mut C, config: &CaptureConfig) -> Result<Self, CameraError> {
        camera.init(config)?;
        Ok(Self { camera })
    }

    fn capture(&mut self) -> Option<C::Frame<'_>> {
        self.camera.capture()
    }
}

impl<C: CameraDriver> Drop for ActiveCamera<'_, C> {
    fn drop(&mut self) {
        self.camera.deinit();
        self.camera.power_down();
        info!("✓ カメラを停止しました");
    }
}

/// 撮影シーケンサー
///
/// SDカードのオープン → カメラ初期化 → ウォームアップ → 撮影 →
/// ファイル名決定 → 書き込み → カメラ停止 を1回の呼び出しで行います。
pub struct CaptureSequencer<C, S, P, D>
where
    C: CameraDriver,
    S: StorageDriver,
    P: OutputPin,
    D: DelayNs,
{
    config: CaptureConfig,
    camera: C,
    storage: S,
    led: StatusLed<P>,
    delay: D,
}

impl<C, S, P, D> CaptureSequencer<C, S, P, D>
where
    C: CameraDriver,
    S: StorageDriver,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(config: CaptureConfig, camera: C, storage: S, led: StatusLed<P>, delay: D) -> Self {
        Self {
            config,
            camera,
            storage,
            led,
            delay,
        }
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 撮影して結果をLEDで通知する
    ///
    /// 失敗時は種類に応じた回数だけLEDを点滅させます。
    pub fn run(&mut self, session: &mut CaptureSession) -> Result<SavedImage, CaptureError> {
        let result = self.capture(session);
        match &result {
            Ok(saved) => info!(
                "✓ 撮影完了: {} ({} bytes), 次のカウンタ: {}",
                saved.file_name,
                saved.bytes,
                session.file_counter()
            ),
            Err(e) => error!("❌ 撮影失敗: {}", e),
        }

        if let Err(e) = signal_outcome(
            &mut self.led,
            &mut self.delay,
            &result,
            self.config.blink_half_period_ms,
        ) {
            warn!("結果のLED表示に失敗しました: {}", e);
        }
        result
    }

    /// 1回分の撮影シーケンスを実行する
    ///
    /// 失敗してもLED点滅は行いません (`run` を参照)。
    /// カウンタは書き込み用ファイルを作成できた場合のみ消費されますが、
    /// ファイル名探索で既存ファイルを飛ばした分は失敗時も戻しません。
    pub fn capture(&mut self, session: &mut CaptureSession) -> Result<SavedImage, CaptureError> {
        set_indicator(&mut self.led, true);
        info!(
            "撮影シーケンスを開始します (カウンタ: {})",
            session.file_counter()
        );

        // SDカードのオープンに失敗した場合はカメラに触れない
        self.storage
            .open(self.config.sd_speed_hz)
            .map_err(CaptureError::StorageOpen)?;
        info!("✓ SDカードを開きました ({} Hz)", self.config.sd_speed_hz);

        // ここで失敗してもSDカードは開いたまま (閉じる操作は行わない)
        let mut camera =
            ActiveCamera::start(&mut self.camera, &self.config).map_err(CaptureError::CameraInit)?;
        info!("✓ カメラを初期化しました");

        // 古いセンサーバッファを読み捨てる
        for i in 0..self.config.warmup_frames {
            match camera.capture() {
                Some(frame) => {
                    info!(
                        "ウォームアップキャプチャ {} / {} ({} bytes を破棄)",
                        i + 1,
                        self.config.warmup_frames,
                        frame.len()
                    );
                }
                None => warn!(
                    "ウォームアップキャプチャ {} / {} でフレームを取得できませんでした",
                    i + 1,
                    self.config.warmup_frames
                ),
            }
        }
        self.delay.delay_ms(self.config.warmup_settle_ms);

        let frame = camera.capture().ok_or(CaptureError::FrameUnavailable)?;
        info!("画像キャプチャ完了: {} bytes", frame.len());

        let storage = &mut self.storage;
        let file_name = resolve_next_file_name(session, |name| storage.exists(name));
        let index = session.file_counter();
        info!("保存先: {}", file_name);

        let result = match storage.create(&file_name) {
            Ok(file) => {
                // ファイルが作成された時点で番号は消費済み
                let written = write_frame(file, frame.data()).map_err(|source| {
                    CaptureError::FileWrite {
                        path: file_name.clone(),
                        source,
                    }
                });
                session.mark_consumed();
                written.map(|bytes| SavedImage {
                    file_name,
                    index,
                    bytes,
                })
            }
            Err(e) => Err(CaptureError::FileOpen(e)),
        };

        drop(frame);

        set_indicator(&mut self.led, false);
        self.delay.delay_ms(self.config.complete_hold_ms);
        drop(camera);

        result
    }
}

/// フレームを一度に書き込み、クローズする
fn write_frame<W: Write>(mut file: W, data: &[u8]) -> std::io::Result<usize> {
    file.write_all(data)?;
    file.flush()?;
    Ok(data.len())
}

fn set_indicator<P: OutputPin>(led: &mut StatusLed<P>, active: bool) {
    let result = if active { led.turn_on() } else { led.turn_off() };
    if let Err(e) = result {
        warn!("ステータスLEDの制御に失敗しました: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::{
        sample_jpeg, CameraEvent, MockCamera, MockOutputPin, MockStorage, RecordingDelay,
    };

    type TestSequencer = CaptureSequencer<MockCamera, MockStorage, MockOutputPin, RecordingDelay>;

    fn sequencer(camera: MockCamera, storage: MockStorage) -> (TestSequencer, MockOutputPin, RecordingDelay) {
        let pin = MockOutputPin::new();
        let delay = RecordingDelay::new();
        let sequencer = CaptureSequencer::new(
            CaptureConfig::default(),
            camera,
            storage,
            StatusLed::new(pin.clone()),
            delay.clone(),
        );
        (sequencer, pin, delay)
    }

    #[test]
    fn test_camera_lifecycle_order_on_success() {
        let camera = MockCamera::new();
        let (mut seq, _, _) = sequencer(camera.clone(), MockStorage::new());
        let mut session = CaptureSession::new();

        seq.capture(&mut session).unwrap();

        assert_eq!(
            camera.events(),
            vec![
                CameraEvent::Init,
                CameraEvent::Capture,
                CameraEvent::Release,
                CameraEvent::Capture,
                CameraEvent::Release,
                CameraEvent::Deinit,
                CameraEvent::PowerDown,
            ]
        );
    }

    #[test]
    fn test_storage_opened_with_configured_speed() {
        let storage = MockStorage::new();
        let (mut seq, _, _) = sequencer(MockCamera::new(), storage.clone());

        seq.capture(&mut CaptureSession::new()).unwrap();

        assert_eq!(storage.open_speeds(), vec![16_000_000]);
        assert_eq!(seq.config().sd_speed_hz, 16_000_000);
    }

    #[test]
    fn test_camera_receives_injected_config() {
        let camera = MockCamera::new();
        let (mut seq, _, _) = sequencer(camera.clone(), MockStorage::new());

        seq.capture(&mut CaptureSession::new()).unwrap();

        assert_eq!(camera.init_configs(), vec![CaptureConfig::default()]);
    }

    #[test]
    fn test_warmup_frame_is_discarded() {
        let warmup = vec![0x00; 16];
        let real = sample_jpeg(512);
        let storage = MockStorage::new();
        let camera = MockCamera::with_frames(vec![Some(warmup), Some(real.clone())]);
        let (mut seq, _, _) = sequencer(camera, storage.clone());

        seq.capture(&mut CaptureSession::new()).unwrap();

        assert_eq!(storage.file("image_001.jpg"), Some(real));
    }

    #[test]
    fn test_missing_warmup_frame_is_tolerated() {
        let real = sample_jpeg(128);
        let storage = MockStorage::new();
        let camera = MockCamera::with_frames(vec![None, Some(real.clone())]);
        let (mut seq, _, _) = sequencer(camera.clone(), storage.clone());

        let saved = seq.capture(&mut CaptureSession::new()).unwrap();

        assert_eq!(saved.bytes, real.len());
        assert_eq!(camera.count(CameraEvent::Release), 1);
    }

    #[test]
    fn test_delays_follow_config() {
        let (mut seq, _, delay) = sequencer(MockCamera::new(), MockStorage::new());

        seq.capture(&mut CaptureSession::new()).unwrap();

        // ウォームアップ後の安定待ち + 完了表示後の保持
        assert_eq!(delay.delays_ms(), vec![20, 50]);
    }

    #[test]
    fn test_indicator_busy_then_off() {
        let (mut seq, pin, _) = sequencer(MockCamera::new(), MockStorage::new());

        seq.capture(&mut CaptureSession::new()).unwrap();

        assert_eq!(pin.levels(), vec![false, true]);
    }

    #[test]
    fn test_write_failure_consumes_counter() {
        let storage = MockStorage::new();
        storage.set_write_error(true);
        let camera = MockCamera::new();
        let (mut seq, _, _) = sequencer(camera.clone(), storage.clone());
        let mut session = CaptureSession::new();

        let result = seq.capture(&mut session);

        assert!(matches!(result, Err(CaptureError::FileWrite { .. })));
        assert_eq!(session.file_counter(), 2);
        assert_eq!(camera.count(CameraEvent::Release), 2);
        assert_eq!(camera.count(CameraEvent::Deinit), 1);
    }

    #[test]
    fn test_run_blinks_on_failure_only() {
        let storage = MockStorage::new();
        let (mut seq, pin, _) = sequencer(MockCamera::new(), storage.clone());
        seq.run(&mut CaptureSession::new()).unwrap();
        assert_eq!(pin.on_count(), 1);

        storage.set_create_error(true);
        let before = pin.on_count();
        assert!(seq.run(&mut CaptureSession::new()).is_err());
        // busy 点灯 1回 + 2回点滅
        assert_eq!(pin.on_count() - before, 3);
        assert!(!pin.is_low());
    }
}
