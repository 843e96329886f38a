use log::{info, warn};

use crate::core::capture_session::CaptureSession;

/// RTCメモリに撮影セッションを保持するモジュール
pub struct RtcManager;

/// RTCメモリエリア（Deep Sleep中も保持される特殊なRAM）にファイルカウンタを保持します。
/// #[link_section = ".rtc.data"] により、通常のRAMではなくRTC RAMに配置されます。
#[link_section = ".rtc.data"]
static mut RTC_FILE_COUNTER: u32 = CaptureSession::INITIAL_COUNTER;

impl RtcManager {
    /// 起動要因を確認し、撮影セッションを復元します
    ///
    /// Deep Sleep からの復帰時のみカウンタを引き継ぎ、それ以外は 1 から始めます。
    pub fn restore_session() -> CaptureSession {
        let reset_reason = unsafe { esp_idf_sys::esp_reset_reason() };

        let reason_str = match reset_reason {
            esp_idf_sys::esp_reset_reason_t_ESP_RST_POWERON => "POWERON (電源投入)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_EXT => "EXT (外部ピンリセット)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_SW => "SW (ソフトウェアリセット)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_PANIC => "PANIC (例外/パニック)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_INT_WDT => "INT_WDT (割り込みWDT)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_TASK_WDT => "TASK_WDT (タスクWDT)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_WDT => "WDT (その他WDT)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_DEEPSLEEP => "DEEPSLEEP (正常復帰)",
            esp_idf_sys::esp_reset_reason_t_ESP_RST_BROWNOUT => "BROWNOUT (電圧低下検出)",
            _ => "UNKNOWN (不明)",
        };

        if reset_reason == esp_idf_sys::esp_reset_reason_t_ESP_RST_DEEPSLEEP {
            let session = CaptureSession::resume(unsafe { RTC_FILE_COUNTER });
            info!("✅ Deep Sleepからの復帰を確認しました (Reason: {})", reason_str);
            info!("✓ 継承ファイルカウンタ: {}", session.file_counter());
            session
        } else {
            let session = CaptureSession::new();
            warn!("⚠️ 非Deepsleep起動を確認しました (Reason: {})", reason_str);
            info!("✓ ファイルカウンタを {} にリセットしました", session.file_counter());
            Self::persist_session(&session);
            session
        }
    }

    /// 現在のカウンタをRTCメモリへ書き戻す
    pub fn persist_session(session: &CaptureSession) {
        unsafe {
            RTC_FILE_COUNTER = session.file_counter();
        }
    }

    /// ボタン (EXT0) による Deep Sleep 復帰か
    pub fn woke_by_button() -> bool {
        let cause = unsafe { esp_idf_sys::esp_sleep_get_wakeup_cause() };
        cause == esp_idf_sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT0
    }
}
