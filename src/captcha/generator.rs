//! Slider challenge generation.
//!
//! Picks a background, places the piece and produces the cut images.

use std::sync::Arc;

use image::RgbImage;
use rand::Rng;
use tracing::debug;

use super::background;
use super::cutter::{cut_piece, draw_cutout};
use super::geometry::{Placement, place_piece};
use super::result::SliderChallenge;
use crate::config::{Config, Result};

/// Produces slider challenges from a validated configuration.
#[derive(Debug, Clone)]
pub struct SliderCaptchaGenerator {
    config: Arc<Config>,
}

impl SliderCaptchaGenerator {
    /// Creates a generator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tolerance or piece size is zero or the canvas
    /// is too small for the piece.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates a challenge using the thread-local RNG.
    #[must_use]
    pub fn generate(&self) -> SliderChallenge {
        self.generate_with(&mut rand::rng())
    }

    /// Generates a challenge drawing every random choice from `rng`.
    pub fn generate_with(&self, rng: &mut impl Rng) -> SliderChallenge {
        let config = &self.config;
        let original = background::resolve(config, rng);
        let placement = place_piece(
            rng,
            config.width,
            config.height,
            config.piece_width,
            config.piece_height,
        );
        debug!(x = placement.x, y = placement.y, "Placed slider piece");

        cut_challenge(
            original,
            placement,
            config.piece_width,
            config.piece_height,
            config.tolerance,
        )
    }
}

/// Cuts a piece out of `original` at `placement` and shades the hole into a
/// copy of it.
///
/// The original image is kept on the challenge for image-matching
/// verification.
#[must_use]
pub fn cut_challenge(
    original: RgbImage,
    placement: Placement,
    piece_width: u32,
    piece_height: u32,
    tolerance: u32,
) -> SliderChallenge {
    let piece = cut_piece(&original, placement, piece_width, piece_height);
    let mut background = original.clone();
    draw_cutout(&mut background, placement, piece_width, piece_height);

    SliderChallenge::new(
        background,
        piece,
        Some(original),
        placement,
        piece_width,
        piece_height,
        tolerance,
    )
}
