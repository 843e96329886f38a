//! テスト用のペリフェラルモック実装
//!
//! 実際のハードウェアを使わずにカメラ・SDカード・GPIO・遅延をシミュレートします。
//! 呼び出し履歴を記録し、テストで検証できます。
//! 各モックは `Clone` で状態を共有するため、ドライバを渡した後も検証に使えます。

use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;
use std::io;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

use crate::core::capture_config::CaptureConfig;
use crate::core::drivers::{CameraDriver, CameraError, FrameBuffer, StorageDriver, StorageError};

/// テスト用のJPEGデータ (SOI + 適当なデータ + EOI)
pub fn sample_jpeg(len: usize) -> Vec<u8> {
    let len = len.max(4);
    let mut data = Vec::with_capacity(len);
    data.extend_from_slice(&[0xFF, 0xD8]);
    for i in 0..(len - 4) {
        data.push(((i * 13 + 57) % 256) as u8);
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

/// カメラに対して行われた操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraEvent {
    Init,
    Capture,
    Release,
    Deinit,
    PowerDown,
}

#[derive(Debug, Default)]
struct MockCameraState {
    fail_init: bool,
    frames: VecDeque<Option<Vec<u8>>>,
    fallback_frame: Option<Vec<u8>>,
    events: Vec<CameraEvent>,
    init_configs: Vec<CaptureConfig>,
}

/// テスト用のカメラモック
#[derive(Debug, Clone, Default)]
pub struct MockCamera {
    state: Arc<Mutex<MockCameraState>>,
}

impl MockCamera {
    /// 毎回同じテスト画像を返すカメラ
    pub fn new() -> Self {
        let camera = Self::default();
        camera.state.lock().unwrap().fallback_frame = Some(sample_jpeg(2048));
        camera
    }

    /// 指定した順にフレームを返し、尽きた後は `None` を返すカメラ
    pub fn with_frames(frames: Vec<Option<Vec<u8>>>) -> Self {
        let camera = Self::default();
        camera.state.lock().unwrap().frames = frames.into();
        camera
    }

    /// テスト用: 初期化エラーをシミュレート
    pub fn set_init_error(&self, enable: bool) {
        self.state.lock().unwrap().fail_init = enable;
    }

    pub fn events(&self) -> Vec<CameraEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn count(&self, event: CameraEvent) -> usize {
        self.events().iter().filter(|&&e| e == event).count()
    }

    /// 初期化時に渡された設定
    pub fn init_configs(&self) -> Vec<CaptureConfig> {
        self.state.lock().unwrap().init_configs.clone()
    }
}

/// モックカメラのフレーム。ドロップで返却を記録する
#[derive(Debug)]
pub struct MockFrame<'a> {
    data: Vec<u8>,
    state: Arc<Mutex<MockCameraState>>,
    _camera: PhantomData<&'a mut MockCamera>,
}

impl FrameBuffer for MockFrame<'_> {
    fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for MockFrame<'_> {
    fn drop(&mut self) {
        self.state.lock().unwrap().events.push(CameraEvent::Release);
    }
}

impl CameraDriver for MockCamera {
    type Frame<'a> = MockFrame<'a>;

    fn init(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        let mut state = self.state.lock().unwrap();
        state.events.push(CameraEvent::Init);
        state.init_configs.push(config.clone());
        if state.fail_init {
            return Err(CameraError::InitFailed("simulated init failure".to_string()));
        }
        Ok(())
    }

    fn capture(&mut self) -> Option<MockFrame<'_>> {
        let mut state = self.state.lock().unwrap();
        state.events.push(CameraEvent::Capture);
        let frame = match state.frames.pop_front() {
            Some(frame) => frame,
            None => state.fallback_frame.clone(),
        };
        frame.map(|data| MockFrame {
            data,
            state: Arc::clone(&self.state),
            _camera: PhantomData,
        })
    }

    fn deinit(&mut self) {
        self.state.lock().unwrap().events.push(CameraEvent::Deinit);
    }

    fn power_down(&mut self) {
        self.state.lock().unwrap().events.push(CameraEvent::PowerDown);
    }
}

#[derive(Debug, Default)]
struct MockStorageState {
    fail_open: bool,
    fail_create: bool,
    fail_write: bool,
    is_open: bool,
    open_speeds: Vec<u32>,
    probes: Vec<String>,
    created: Vec<String>,
    files: BTreeMap<String, Vec<u8>>,
}

/// テスト用のSDカードモック (メモリ上のフラットなファイルシステム)
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    state: Arc<Mutex<MockStorageState>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存ファイルを配置したストレージ
    pub fn with_files<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let storage = Self::new();
        {
            let mut state = storage.state.lock().unwrap();
            for name in names {
                state.files.insert(name.into(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
            }
        }
        storage
    }

    /// テスト用: オープン (マウント) エラーをシミュレート
    pub fn set_open_error(&self, enable: bool) {
        self.state.lock().unwrap().fail_open = enable;
    }

    /// テスト用: ファイル作成エラーをシミュレート
    pub fn set_create_error(&self, enable: bool) {
        self.state.lock().unwrap().fail_create = enable;
    }

    /// テスト用: 書き込みエラーをシミュレート
    pub fn set_write_error(&self, enable: bool) {
        self.state.lock().unwrap().fail_write = enable;
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().unwrap().is_open
    }

    /// `open` に渡されたクロック
    pub fn open_speeds(&self) -> Vec<u32> {
        self.state.lock().unwrap().open_speeds.clone()
    }

    /// 存在確認されたファイル名 (呼び出し順)
    pub fn probes(&self) -> Vec<String> {
        self.state.lock().unwrap().probes.clone()
    }

    /// 作成が試みられたファイル名
    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(name).cloned()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }
}

/// モックストレージの書き込みハンドル
#[derive(Debug)]
pub struct MockFile {
    name: String,
    state: Arc<Mutex<MockStorageState>>,
}

impl io::Write for MockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fail_write {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write failure"));
        }
        state
            .files
            .entry(self.name.clone())
            .or_default()
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StorageDriver for MockStorage {
    type File = MockFile;

    fn open(&mut self, speed_hz: u32) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.open_speeds.push(speed_hz);
        if state.fail_open {
            return Err(StorageError::OpenFailed("simulated mount failure".to_string()));
        }
        state.is_open = true;
        Ok(())
    }

    fn exists(&mut self, name: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        state.probes.push(name.to_string());
        state.files.contains_key(name)
    }

    fn create(&mut self, name: &str) -> Result<MockFile, StorageError> {
        let mut state = self.state.lock().unwrap();
        state.created.push(name.to_string());
        if state.fail_create {
            return Err(StorageError::CreateFailed {
                path: name.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "simulated create failure"),
            });
        }
        state.files.insert(name.to_string(), Vec::new());
        Ok(MockFile {
            name: name.to_string(),
            state: Arc::clone(&self.state),
        })
    }
}

/// GPIO操作のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct MockOutputPinState {
    fail: bool,
    /// 出力履歴 (true = High)
    levels: Vec<bool>,
}

/// テスト用の出力ピン
#[derive(Debug, Clone, Default)]
pub struct MockOutputPin {
    state: Arc<Mutex<MockOutputPinState>>,
}

impl MockOutputPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, enable: bool) {
        self.state.lock().unwrap().fail = enable;
    }

    pub fn levels(&self) -> Vec<bool> {
        self.state.lock().unwrap().levels.clone()
    }

    /// 最後の出力がLowか
    pub fn is_low(&self) -> bool {
        self.levels().last() == Some(&false)
    }

    /// Low (アクティブLowのLEDでは点灯) にした回数
    pub fn on_count(&self) -> usize {
        self.levels().iter().filter(|&&high| !high).count()
    }

    fn push(&mut self, high: bool) -> Result<(), MockPinError> {
        let mut state = self.state.lock().unwrap();
        if state.fail {
            return Err(MockPinError);
        }
        state.levels.push(high);
        Ok(())
    }
}

impl ErrorType for MockOutputPin {
    type Error = MockPinError;
}

impl OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.push(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.push(true)
    }
}

/// テスト用の入力ピン
///
/// 読み取りごとに台本のレベルを先頭から返し、尽きた後は最後のレベルを返し続けます。
#[derive(Debug, Clone, Default)]
pub struct MockInputPin {
    /// 読み取り結果 (true = Low)
    script: Arc<Mutex<VecDeque<bool>>>,
    last_low: Arc<Mutex<bool>>,
    reads: Arc<Mutex<usize>>,
}

impl MockInputPin {
    pub fn with_low_levels(levels: Vec<bool>) -> Self {
        Self {
            script: Arc::new(Mutex::new(levels.into())),
            last_low: Arc::new(Mutex::new(false)),
            reads: Arc::new(Mutex::new(0)),
        }
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    fn next_is_low(&mut self) -> bool {
        *self.reads.lock().unwrap() += 1;
        let mut last = self.last_low.lock().unwrap();
        if let Some(level) = self.script.lock().unwrap().pop_front() {
            *last = level;
        }
        *last
    }
}

impl ErrorType for MockInputPin {
    type Error = Infallible;
}

impl InputPin for MockInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.next_is_low())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.next_is_low())
    }
}

/// 待機時間を記録するだけの遅延
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    delays_ms: Arc<Mutex<Vec<u32>>>,
    total_ns: Arc<Mutex<u64>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// `delay_ms` で要求された待機時間 (呼び出し順)
    pub fn delays_ms(&self) -> Vec<u32> {
        self.delays_ms.lock().unwrap().clone()
    }

    pub fn total_ms(&self) -> u64 {
        *self.total_ns.lock().unwrap() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.lock().unwrap() += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays_ms.lock().unwrap().push(ms);
        *self.total_ns.lock().unwrap() += u64::from(ms) * 1_000_000;
    }
}
