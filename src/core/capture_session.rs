/// 撮影セッション
///
/// 次に試すファイル番号を保持します。電源断で 1 に戻り、
/// Deep Sleep をまたぐ保持は `RtcManager` が担当します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSession {
    file_counter: u32,
}

impl CaptureSession {
    pub const INITIAL_COUNTER: u32 = 1;

    pub fn new() -> Self {
        Self {
            file_counter: Self::INITIAL_COUNTER,
        }
    }

    /// 保存済みのカウンタから再開する (0 は 1 として扱う)
    pub fn resume(file_counter: u32) -> Self {
        Self {
            file_counter: file_counter.max(Self::INITIAL_COUNTER),
        }
    }

    pub fn file_counter(&self) -> u32 {
        self.file_counter
    }

    /// 既存ファイルと衝突した番号を飛ばす
    pub fn skip_existing(&mut self) {
        self.file_counter = self.file_counter.saturating_add(1);
    }

    /// 書き込みに使用した番号を消費済みにする
    pub fn mark_consumed(&mut self) {
        self.file_counter = self.file_counter.saturating_add(1);
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_one() {
        assert_eq!(CaptureSession::new().file_counter(), 1);
        assert_eq!(CaptureSession::default(), CaptureSession::new());
    }

    #[test]
    fn test_resume_clamps_zero() {
        assert_eq!(CaptureSession::resume(0).file_counter(), 1);
        assert_eq!(CaptureSession::resume(42).file_counter(), 42);
    }

    #[test]
    fn test_counter_is_monotonic() {
        let mut session = CaptureSession::resume(7);
        session.skip_existing();
        assert_eq!(session.file_counter(), 8);
        session.mark_consumed();
        assert_eq!(session.file_counter(), 9);
    }

    #[test]
    fn test_counter_saturates() {
        let mut session = CaptureSession::resume(u32::MAX);
        session.mark_consumed();
        assert_eq!(session.file_counter(), u32::MAX);
    }
}
