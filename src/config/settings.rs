//! Configuration settings.
//!
//! Defines the main `Config` struct and environment variable loading logic.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use super::error::{CaptchaError, Result};
use crate::captcha::background::BuiltinBackground;
use crate::captcha::geometry::{self, DEFAULT_PIECE_HEIGHT, DEFAULT_PIECE_WIDTH};

const DEFAULT_WIDTH: u32 = 350;
const DEFAULT_HEIGHT: u32 = 200;
const DEFAULT_TOLERANCE: u32 = 12;
const DEFAULT_POOL_CAPACITY: usize = 16;

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_u32_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    non_empty(lookup, key)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_usize_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    non_empty(lookup, key)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Slider captcha configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Accepted distance between claimed and true offset, in pixels.
    pub tolerance: u32,
    /// Piece body width, excluding the tab.
    pub piece_width: u32,
    /// Piece height.
    pub piece_height: u32,
    /// External background image, tried before the built-in set.
    pub background_path: Option<PathBuf>,
    /// Explicit built-in background; `None` picks one at random.
    pub builtin_background: Option<BuiltinBackground>,
    /// Number of challenges the pre-generation pool keeps ready.
    pub pool_capacity: usize,
    /// Directory the binary writes generated images into.
    pub output_dir: PathBuf,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tolerance: DEFAULT_TOLERANCE,
            piece_width: DEFAULT_PIECE_WIDTH,
            piece_height: DEFAULT_PIECE_HEIGHT,
            background_path: None,
            builtin_background: None,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            output_dir: PathBuf::from("."),
            log_format: "json".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Every setting is optional; unset or malformed values keep their defaults.
    #[must_use]
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self::from_vars(|key| env::var(key).ok()))
    }

    /// Loads configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let builtin_background = non_empty(&lookup, "SLIDER_BACKGROUND")
            .filter(|name| !name.eq_ignore_ascii_case("random"))
            .and_then(|name| match name.parse::<BuiltinBackground>() {
                Ok(bg) => Some(bg),
                Err(e) => {
                    warn!(error = %e, "Falling back to a random built-in background");
                    None
                }
            });

        Self {
            width: get_u32_or(&lookup, "CAPTCHA_WIDTH", DEFAULT_WIDTH),
            height: get_u32_or(&lookup, "CAPTCHA_HEIGHT", DEFAULT_HEIGHT),
            tolerance: get_u32_or(&lookup, "SLIDER_TOLERANCE", DEFAULT_TOLERANCE),
            piece_width: get_u32_or(&lookup, "SLIDER_PIECE_WIDTH", DEFAULT_PIECE_WIDTH),
            piece_height: get_u32_or(&lookup, "SLIDER_PIECE_HEIGHT", DEFAULT_PIECE_HEIGHT),
            background_path: non_empty(&lookup, "SLIDER_BACKGROUND_PATH").map(PathBuf::from),
            builtin_background,
            pool_capacity: get_usize_or(&lookup, "CAPTCHA_POOL_SIZE", DEFAULT_POOL_CAPACITY),
            output_dir: non_empty(&lookup, "OUTPUT_DIR")
                .map_or_else(|| PathBuf::from("."), PathBuf::from),
            log_format: non_empty(&lookup, "LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
        }
    }

    /// Checks the settings a challenge depends on.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance or piece size is zero, or if the
    /// canvas leaves no room to place the piece inside its margins.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance == 0 {
            return Err(CaptchaError::InvalidTolerance);
        }
        if self.piece_width == 0 || self.piece_height == 0 {
            return Err(CaptchaError::Config(format!(
                "piece size must be positive, got {}x{}",
                self.piece_width, self.piece_height
            )));
        }
        geometry::check_canvas(self.width, self.height, self.piece_width, self.piece_height)
    }
}
