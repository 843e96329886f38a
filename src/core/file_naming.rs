use log::debug;

use super::capture_session::CaptureSession;

pub const IMAGE_FILE_PREFIX: &str = "image_";
pub const IMAGE_FILE_EXTENSION: &str = ".jpg";

/// ファイル番号から画像ファイル名を生成 (`image_001.jpg`)
///
/// 3桁未満はゼロ埋めし、1000以上はそのまま桁が増えます。
pub fn image_file_name(index: u32) -> String {
    format!("{}{:03}{}", IMAGE_FILE_PREFIX, index, IMAGE_FILE_EXTENSION)
}

/// 画像ファイル名からファイル番号を取り出す
pub fn parse_image_index(name: &str) -> Option<u32> {
    let digits = name
        .strip_prefix(IMAGE_FILE_PREFIX)?
        .strip_suffix(IMAGE_FILE_EXTENSION)?;
    if digits.len() < 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// 現在のカウンタから未使用のファイル名を線形探索する
///
/// 既存ファイルに当たるたびにセッションのカウンタを進めます。
/// 探索回数に上限はありません。
pub fn resolve_next_file_name<F>(session: &mut CaptureSession, mut exists: F) -> String
where
    F: FnMut(&str) -> bool,
{
    loop {
        let name = image_file_name(session.file_counter());
        if !exists(&name) {
            return name;
        }
        debug!("{} は既に存在します。次の番号を試します", name);
        session.skip_existing();
    }
}
