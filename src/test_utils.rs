//! Test utilities and shared fixtures.
//!
//! Deterministic textures and a standard configuration shared by unit and
//! integration tests.

#[cfg(any(test, feature = "testing"))]
use crate::config::Config;
#[cfg(any(test, feature = "testing"))]
use image::{Rgb, RgbImage};
#[cfg(any(test, feature = "testing"))]
use std::sync::Arc;

/// Creates the default 350x200 configuration with tolerance 12.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        log_format: "pretty".to_string(),
        ..Config::default()
    })
}

#[cfg(any(test, feature = "testing"))]
const fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Deterministic per-pixel noise with no correlation between neighbours.
///
/// Only the exact offset of a piece cut from it scores high.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn noise_texture(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, ..] = mix((u64::from(y) << 32) | u64::from(x)).to_le_bytes();
        Rgb([r, g, b])
    })
}

/// Smooth texture whose similarity decays steadily with horizontal shift.
#[cfg(any(test, feature = "testing"))]
#[must_use]
pub fn gradient_texture(width: u32, height: u32) -> RgbImage {
    let w = u64::from(width.saturating_sub(1).max(1));
    let h = u64::from(height.saturating_sub(1).max(1));
    RgbImage::from_fn(width, height, |x, y| {
        let (x, y) = (u64::from(x), u64::from(y));
        let channel = |v: u64| u8::try_from(v).unwrap_or(u8::MAX);
        Rgb([
            channel(x * 255 / w),
            channel(y * 255 / h),
            channel(x * x * 255 / (w * w)),
        ])
    })
}
