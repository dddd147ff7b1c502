//! Slider challenge result and verification.
//!
//! A `SliderChallenge` is immutable once built. Every verification method is
//! a pure function of the captured images and placement, so a challenge can
//! be shared across threads and verified concurrently without locking.

use std::fmt;

use image::{RgbImage, RgbaImage};

use super::Captcha;
use super::geometry::Placement;
use super::similarity::{self, BestMatch, SIMILARITY_THRESHOLD};
use crate::config::Result;
use crate::encoding;

const LOOSE_MULTIPLIER: f64 = 1.5;

/// Generated slider puzzle: both images, the true placement and the
/// parameters needed to judge an answer.
#[derive(Debug, Clone)]
pub struct SliderChallenge {
    background: RgbImage,
    piece: RgbaImage,
    original: Option<RgbImage>,
    placement: Placement,
    piece_width: u32,
    piece_height: u32,
    width: u32,
    height: u32,
    tolerance: u32,
}

impl SliderChallenge {
    /// Wraps the outputs of one generation run.
    ///
    /// Without `original` the challenge can only perform plain coordinate
    /// checks.
    #[must_use]
    pub fn new(
        background: RgbImage,
        piece: RgbaImage,
        original: Option<RgbImage>,
        placement: Placement,
        piece_width: u32,
        piece_height: u32,
        tolerance: u32,
    ) -> Self {
        let (width, height) = background.dimensions();
        Self {
            background,
            piece,
            original,
            placement,
            piece_width,
            piece_height,
            width,
            height,
            tolerance,
        }
    }

    /// Background with the shaded hole.
    #[must_use]
    pub const fn background(&self) -> &RgbImage {
        &self.background
    }

    /// Detachable piece with per-pixel transparency.
    #[must_use]
    pub const fn piece(&self) -> &RgbaImage {
        &self.piece
    }

    /// Background as it was before the hole was shaded in.
    #[must_use]
    pub const fn original(&self) -> Option<&RgbImage> {
        self.original.as_ref()
    }

    #[must_use]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    /// True horizontal offset of the piece.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.placement.x
    }

    /// Vertical offset of the piece, fixed for the whole challenge.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.placement.y
    }

    #[must_use]
    pub const fn piece_width(&self) -> u32 {
        self.piece_width
    }

    #[must_use]
    pub const fn piece_height(&self) -> u32 {
        self.piece_height
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub const fn tolerance(&self) -> u32 {
        self.tolerance
    }

    /// Background encoded as a PNG data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn background_data_uri(&self) -> Result<String> {
        encoding::png_data_uri(&self.background)
    }

    /// Piece encoded as a PNG data URI.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn piece_data_uri(&self) -> Result<String> {
        encoding::png_data_uri(&self.piece)
    }

    fn within(&self, user_x: i64, tolerance: u64) -> bool {
        i64::from(self.placement.x).abs_diff(user_x) <= tolerance
    }

    fn coordinate_check(&self, user_x: i64) -> bool {
        self.within(user_x, u64::from(self.tolerance))
    }

    /// Verifies a dragged offset, using image matching when possible.
    #[must_use]
    pub fn verify_position(&self, user_x: i64) -> bool {
        if self.original.is_some() {
            self.verify_position_smart(user_x)
        } else {
            self.coordinate_check(user_x)
        }
    }

    /// Searches the window around `user_x` for the best-matching offset.
    ///
    /// Passes when the best score reaches the similarity threshold and the
    /// best offset is itself within tolerance of the true offset. Falls back
    /// to the coordinate check when no original image was kept.
    #[must_use]
    pub fn verify_position_smart(&self, user_x: i64) -> bool {
        if self.original.is_none() {
            return self.coordinate_check(user_x);
        }
        let best = self.best_match(user_x);
        best.similarity >= SIMILARITY_THRESHOLD && self.coordinate_check(best.x)
    }

    /// Coordinate check with the tolerance widened by half.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn verify_position_loose(&self, user_x: i64) -> bool {
        let loose = (f64::from(self.tolerance) * LOOSE_MULTIPLIER) as u64;
        self.within(user_x, loose)
    }

    /// Signed distance still to travel; positive means move right.
    #[must_use]
    pub fn position_difference(&self, user_x: i64) -> i64 {
        i64::from(self.placement.x).saturating_sub(user_x)
    }

    /// Similarity of the piece placed at `x` on the uncut image, or 0 when no
    /// original image was kept.
    #[must_use]
    pub fn similarity_at(&self, x: i64) -> f64 {
        self.original.as_ref().map_or(0.0, |original| {
            similarity::similarity(
                original,
                &self.piece,
                x,
                i64::from(self.placement.y),
                self.piece_width,
                self.piece_height,
            )
        })
    }

    /// Best-scoring offset within tolerance of `user_x`.
    #[must_use]
    pub fn best_match(&self, user_x: i64) -> BestMatch {
        let window =
            similarity::search_window(user_x, self.tolerance, self.width, self.piece_width);
        similarity::best_match(window, user_x, |x| self.similarity_at(x))
    }

    /// Structured breakdown of how `user_x` is judged.
    #[must_use]
    pub fn verify_report(&self, user_x: i64) -> VerifyReport {
        let smart = self.original.as_ref().map(|_| {
            let best = self.best_match(user_x);
            let similarity_pass = best.similarity >= SIMILARITY_THRESHOLD;
            SmartReport {
                user_similarity: self.similarity_at(user_x),
                best,
                threshold: SIMILARITY_THRESHOLD,
                similarity_pass,
                passed: similarity_pass && self.coordinate_check(best.x),
            }
        });

        VerifyReport {
            true_x: self.placement.x,
            user_x,
            difference: i64::from(self.placement.x).abs_diff(user_x),
            tolerance: self.tolerance,
            coordinate_pass: self.coordinate_check(user_x),
            smart,
        }
    }

    /// Human-readable verification report for `user_x`.
    #[must_use]
    pub fn verify_details(&self, user_x: i64) -> String {
        self.verify_report(user_x).to_string()
    }
}

impl Captcha for SliderChallenge {
    fn answer(&self) -> String {
        self.placement.x.to_string()
    }

    /// Plain coordinate check, even when image matching is available.
    fn verify(&self, input: &str) -> bool {
        input
            .trim()
            .parse::<i64>()
            .is_ok_and(|user_x| self.coordinate_check(user_x))
    }
}

/// Image-matching part of a [`VerifyReport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmartReport {
    pub user_similarity: f64,
    pub best: BestMatch,
    pub threshold: f64,
    pub similarity_pass: bool,
    pub passed: bool,
}

/// Verification breakdown for one claimed offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerifyReport {
    pub true_x: u32,
    pub user_x: i64,
    pub difference: u64,
    pub tolerance: u32,
    pub coordinate_pass: bool,
    /// Present when the challenge kept its original image.
    pub smart: Option<SmartReport>,
}

impl VerifyReport {
    /// Final verdict, matching [`SliderChallenge::verify_position`].
    #[must_use]
    pub fn passed(&self) -> bool {
        self.smart.map_or(self.coordinate_pass, |smart| smart.passed)
    }

    /// Directional advice for a failed attempt.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        if self.passed() {
            return None;
        }
        match self.smart {
            Some(smart) if smart.best.similarity <= 0.0 => None,
            Some(smart) if !smart.similarity_pass => Some(format!(
                "similarity too low, align more precisely; try {} px",
                smart.best.x
            )),
            Some(smart) => Some(move_hint(smart.best.x.saturating_sub(self.user_x))),
            None => Some(move_hint(i64::from(self.true_x).saturating_sub(self.user_x))),
        }
    }
}

fn move_hint(delta: i64) -> String {
    let direction = if delta > 0 { "right" } else { "left" };
    format!("offset too large; move {direction} {} px", delta.unsigned_abs())
}

const fn verdict(pass: bool) -> &'static str {
    if pass { "pass" } else { "fail" }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slider verification report")?;
        writeln!(f, "[coordinates]")?;
        writeln!(f, "  true x:      {} px", self.true_x)?;
        writeln!(f, "  user x:      {} px", self.user_x)?;
        writeln!(f, "  difference:  {} px", self.difference)?;
        writeln!(f, "  tolerance:   {} px", self.tolerance)?;
        writeln!(f, "  check:       {}", verdict(self.coordinate_pass))?;

        match self.smart {
            Some(smart) => {
                writeln!(f, "[image matching]")?;
                writeln!(f, "  similarity at user x: {:.2}%", smart.user_similarity)?;
                writeln!(
                    f,
                    "  best match:           {} px ({:.2}%)",
                    smart.best.x, smart.best.similarity
                )?;
                writeln!(f, "  threshold:            {:.2}%", smart.threshold)?;
                writeln!(f, "  similarity check:     {}", verdict(smart.similarity_pass))?;
                writeln!(f, "[result]")?;
                writeln!(f, "  method:  image matching")?;
            }
            None => {
                writeln!(f, "[result]")?;
                writeln!(f, "  method:  coordinates")?;
            }
        }
        write!(f, "  verdict: {}", verdict(self.passed()))?;
        if let Some(hint) = self.hint() {
            write!(f, "\n  hint:    {hint}")?;
        }
        Ok(())
    }
}
