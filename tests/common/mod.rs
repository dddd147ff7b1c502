use image::{Rgb, RgbImage};
use slidecap::Config;
use std::path::PathBuf;
use std::sync::Arc;

pub fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        log_format: "pretty".to_string(),
        ..Config::default()
    })
}

pub fn config_with(f: impl FnOnce(&mut Config)) -> Arc<Config> {
    let mut config = Config::default();
    f(&mut config);
    Arc::new(config)
}

/// Uncorrelated per-pixel noise; only the exact cut position matches.
pub fn noise_texture(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let mut z = (u64::from(y) << 32) | u64::from(x);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        let [r, g, b, ..] = (z ^ (z >> 31)).to_le_bytes();
        Rgb([r, g, b])
    })
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("slidecap-it-{}-{name}", std::process::id()))
}
