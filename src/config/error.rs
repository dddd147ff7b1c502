//! Error types and result aliases.
//!
//! Defines the core `CaptchaError` enumeration and common `Result` type.

use thiserror::Error;

/// Errors raised while configuring or producing slider challenges.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Verification tolerance must be at least one pixel.
    #[error("tolerance must be greater than zero")]
    InvalidTolerance,

    /// Canvas cannot fit the piece inside the placement margins.
    #[error(
        "canvas {width}x{height} is too small for a {piece_width}x{piece_height} puzzle piece"
    )]
    CanvasTooSmall {
        width: u32,
        height: u32,
        piece_width: u32,
        piece_height: u32,
    },

    /// Name does not match any built-in background.
    #[error("unknown built-in background: {0}")]
    UnknownBackground(String),

    /// Image decode, encode or file access failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;
