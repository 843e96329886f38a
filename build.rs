/// ビルド時の設定チェック
///
/// `cfg.toml` の値を読み込み、明らかに不正な値は警告として表示します。
/// 実行時の検証は `core::config_validation` が担当します。
#[toml_cfg::toml_config]
pub struct Config {
    #[default(16_000_000)]
    sd_speed_hz: u32,

    #[default(4)]
    jpeg_quality: u8,

    #[default(1)]
    camera_warmup_frames: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=cfg.toml");

    if !std::path::Path::new("cfg.toml").exists() {
        println!("cargo:warning=cfg.toml が見つかりません。デフォルト設定でビルドします (cfg.toml.example を参照)");
    }

    let config = CONFIG;
    if config.jpeg_quality > 63 {
        println!(
            "cargo:warning=jpeg_quality の値が無効です (0-63): {}",
            config.jpeg_quality
        );
    }
    if config.sd_speed_hz < 400_000 || config.sd_speed_hz > 40_000_000 {
        println!(
            "cargo:warning=sd_speed_hz の値が範囲外です (400kHz-40MHz): {}",
            config.sd_speed_hz
        );
    }
    if config.camera_warmup_frames > 10 {
        println!(
            "cargo:warning=camera_warmup_frames の値が無効です (0-10): {}",
            config.camera_warmup_frames
        );
    }

    // ESP-IDF ターゲットの場合のみリンク設定を出力
    let target = std::env::var("TARGET").unwrap_or_default();
    if target.contains("espidf") {
        embuild::espidf::sysenv::output();
    }
}
