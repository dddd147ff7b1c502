//! Piece-to-background similarity scoring.
//!
//! A candidate offset is scored by overlaying the piece on the original
//! (uncut) image and comparing the pixels the piece actually covers.

use std::ops::RangeInclusive;

use image::{RgbImage, RgbaImage};

/// Piece pixels with alpha below this value are outside the silhouette.
pub const OPACITY_GATE: u8 = 50;
/// Channel-sum difference under which two pixels count as matched.
pub const MATCH_THRESHOLD: u32 = 30;
/// Minimum score, in percent, for the best candidate to be accepted.
pub const SIMILARITY_THRESHOLD: f64 = 88.0;

const PIXEL_MATCH_WEIGHT: f64 = 0.7;
const COLOR_WEIGHT: f64 = 0.3;
/// Maps an average channel-sum difference (0..=765) onto 0..=100.
const COLOR_DIFF_DIVISOR: f64 = 7.65;

/// Raw counters of one piece-versus-original comparison.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PixelComparison {
    pub participating: u32,
    pub matched: u32,
    pub total_color_diff: u32,
}

impl PixelComparison {
    /// Share of participating pixels that matched, in percent.
    #[must_use]
    pub fn pixel_match_rate(&self) -> f64 {
        if self.participating == 0 {
            return 0.0;
        }
        f64::from(self.matched) / f64::from(self.participating) * 100.0
    }

    /// Average color closeness, in percent.
    #[must_use]
    pub fn color_similarity(&self) -> f64 {
        if self.participating == 0 {
            return 0.0;
        }
        let avg_diff = f64::from(self.total_color_diff) / f64::from(self.participating);
        (100.0 - avg_diff / COLOR_DIFF_DIVISOR).max(0.0)
    }

    /// Weighted blend of match rate and color closeness, 0..=100.
    #[must_use]
    pub fn score(&self) -> f64 {
        if self.participating == 0 {
            return 0.0;
        }
        PIXEL_MATCH_WEIGHT.mul_add(self.pixel_match_rate(), COLOR_WEIGHT * self.color_similarity())
    }
}

/// Compares the `piece_width`x`piece_height` window of `original` anchored at
/// `(x, y)` with the piece anchored at its own origin.
///
/// Windows that do not fit inside `original` yield an empty comparison.
#[must_use]
pub fn compare_at(
    original: &RgbImage,
    piece: &RgbaImage,
    x: i64,
    y: i64,
    piece_width: u32,
    piece_height: u32,
) -> PixelComparison {
    let (width, height) = original.dimensions();
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return PixelComparison::default();
    };
    if u64::from(x) + u64::from(piece_width) > u64::from(width)
        || u64::from(y) + u64::from(piece_height) > u64::from(height)
    {
        return PixelComparison::default();
    }

    let mut comparison = PixelComparison::default();
    for dy in 0..piece_height {
        for dx in 0..piece_width {
            let Some(piece_px) = piece.get_pixel_checked(dx, dy) else {
                continue;
            };
            if piece_px[3] < OPACITY_GATE {
                continue;
            }
            let original_px = original.get_pixel(x + dx, y + dy);
            let diff: u32 = (0..3)
                .map(|c| u32::from(original_px[c].abs_diff(piece_px[c])))
                .sum();

            comparison.participating += 1;
            comparison.total_color_diff += diff;
            if diff < MATCH_THRESHOLD {
                comparison.matched += 1;
            }
        }
    }
    comparison
}

/// Similarity score of the piece placed at `(x, y)`.
#[must_use]
pub fn similarity(
    original: &RgbImage,
    piece: &RgbaImage,
    x: i64,
    y: i64,
    piece_width: u32,
    piece_height: u32,
) -> f64 {
    compare_at(original, piece, x, y, piece_width, piece_height).score()
}

/// Highest-scoring candidate of a window search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMatch {
    pub x: i64,
    pub similarity: f64,
}

/// Candidate offsets within `tolerance` of `user_x` that keep the piece body
/// on the canvas. May be empty.
#[must_use]
pub fn search_window(
    user_x: i64,
    tolerance: u32,
    canvas_width: u32,
    piece_width: u32,
) -> RangeInclusive<i64> {
    let tolerance = i64::from(tolerance);
    let last = i64::from(canvas_width) - i64::from(piece_width);
    user_x.saturating_sub(tolerance).max(0)..=user_x.saturating_add(tolerance).min(last)
}

/// Scans `window` left to right and keeps the strict maximum.
///
/// Ties keep the lowest offset. When nothing scores above zero the best match
/// stays at `user_x` with similarity 0.
pub fn best_match(
    window: RangeInclusive<i64>,
    user_x: i64,
    mut score: impl FnMut(i64) -> f64,
) -> BestMatch {
    let mut best = BestMatch {
        x: user_x,
        similarity: 0.0,
    };
    for x in window {
        let similarity = score(x);
        if similarity > best.similarity {
            best = BestMatch { x, similarity };
        }
    }
    best
}
