//! Puzzle piece placement and silhouette.
//!
//! The silhouette is a rounded rectangle with a circular tab on the right
//! edge and a circular notch in the bottom edge. It is expressed as a signed
//! distance field so the cutter and the cutout renderer rasterise exactly the
//! same region.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::config::{CaptchaError, Result};

pub const DEFAULT_PIECE_WIDTH: u32 = 60;
pub const DEFAULT_PIECE_HEIGHT: u32 = 60;
/// Radius of both the tab and the notch.
pub const TAB_RADIUS: u32 = 10;
pub const CORNER_RADIUS: f32 = 5.0;
/// Minimum gap between the piece and the canvas edges.
pub const EDGE_MARGIN: u32 = 20;

/// Top-left corner of the piece body on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Horizontal positions a piece may be placed at.
///
/// The left third is kept free so there is always room to drag right.
#[must_use]
pub fn x_range(canvas_width: u32, piece_width: u32) -> RangeInclusive<u32> {
    let max = canvas_width
        .saturating_sub(piece_width)
        .saturating_sub(TAB_RADIUS)
        .saturating_sub(EDGE_MARGIN);
    (canvas_width / 3)..=max
}

/// Vertical positions a piece may be placed at.
#[must_use]
pub fn y_range(canvas_height: u32, piece_height: u32) -> RangeInclusive<u32> {
    let max = canvas_height
        .saturating_sub(piece_height)
        .saturating_sub(EDGE_MARGIN);
    EDGE_MARGIN..=max
}

/// Verifies that a canvas can host a piece of the given size.
///
/// The canvas must be wider than twice the piece, taller than twice the
/// piece plus both vertical margins, and leave both placement ranges
/// non-empty.
///
/// # Errors
///
/// Returns `CanvasTooSmall` if any of these conditions fails.
pub fn check_canvas(
    canvas_width: u32,
    canvas_height: u32,
    piece_width: u32,
    piece_height: u32,
) -> Result<()> {
    let (width, height) = (u64::from(canvas_width), u64::from(canvas_height));
    let (pw, ph) = (u64::from(piece_width), u64::from(piece_height));
    let margin = u64::from(EDGE_MARGIN);

    let fits_x = width > 2 * pw && width / 3 + pw + u64::from(TAB_RADIUS) + margin <= width;
    let fits_y = height > 2 * ph + 2 * margin && margin + ph + margin <= height;
    if fits_x && fits_y {
        Ok(())
    } else {
        Err(CaptchaError::CanvasTooSmall {
            width: canvas_width,
            height: canvas_height,
            piece_width,
            piece_height,
        })
    }
}

/// Picks a uniformly random placement inside the canvas margins.
///
/// The canvas must have passed [`check_canvas`]; on a canvas that is too
/// small the lower bound of each range is returned.
pub fn place_piece(
    rng: &mut impl Rng,
    canvas_width: u32,
    canvas_height: u32,
    piece_width: u32,
    piece_height: u32,
) -> Placement {
    Placement {
        x: pick(rng, x_range(canvas_width, piece_width)),
        y: pick(rng, y_range(canvas_height, piece_height)),
    }
}

fn pick(rng: &mut impl Rng, range: RangeInclusive<u32>) -> u32 {
    if range.is_empty() {
        *range.start()
    } else {
        rng.random_range(range)
    }
}

/// Puzzle piece silhouette anchored at a canvas position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceShape {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl PieceShape {
    /// Builds the silhouette for a piece body at `(x, y)` of size `width`x`height`.
    #[must_use]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: px(x),
            y: px(y),
            width: px(width),
            height: px(height),
        }
    }

    /// Same silhouette anchored at a placement.
    #[must_use]
    pub fn at(placement: Placement, width: u32, height: u32) -> Self {
        Self::new(placement.x, placement.y, width, height)
    }

    /// Signed distance from `(px, py)` to the silhouette edge; negative inside.
    #[must_use]
    pub fn signed_distance(&self, px: f32, py: f32) -> f32 {
        let radius = tab_radius();
        let body = rounded_rect_distance(
            px - (self.x + self.width / 2.0),
            py - (self.y + self.height / 2.0),
            self.width / 2.0,
            self.height / 2.0,
            CORNER_RADIUS,
        );
        let tab = circle_distance(
            px,
            py,
            self.x + self.width,
            self.y + self.height / 2.0,
            radius,
        );
        let notch = circle_distance(
            px,
            py,
            self.x + self.width / 2.0,
            self.y + self.height,
            radius,
        );
        body.min(tab).max(-notch)
    }

    #[must_use]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.signed_distance(px, py) < 0.0
    }

    /// Distance sampled at the centre of pixel `(col, row)`.
    #[must_use]
    pub fn pixel_distance(&self, col: u32, row: u32) -> f32 {
        self.signed_distance(px(col) + 0.5, px(row) + 0.5)
    }

    /// Whether pixel `(col, row)` belongs to the silhouette.
    #[must_use]
    pub fn covers_pixel(&self, col: u32, row: u32) -> bool {
        self.pixel_distance(col, row) < 0.0
    }

    /// Pixel bounding box `(x0, y0, x1, y1)`, end-exclusive, tab included.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (
            self.x.floor().max(0.0) as u32,
            self.y.floor().max(0.0) as u32,
            (self.x + self.width + tab_radius()).ceil().max(0.0) as u32,
            (self.y + self.height).ceil().max(0.0) as u32,
        )
    }
}

#[inline]
fn px(v: u32) -> f32 {
    f32::from(u16::try_from(v).unwrap_or(u16::MAX))
}

#[inline]
fn tab_radius() -> f32 {
    px(TAB_RADIUS)
}

fn circle_distance(px: f32, py: f32, cx: f32, cy: f32, radius: f32) -> f32 {
    (px - cx).hypot(py - cy) - radius
}

// Offsets are relative to the rectangle centre.
fn rounded_rect_distance(dx: f32, dy: f32, half_w: f32, half_h: f32, radius: f32) -> f32 {
    let radius = radius.min(half_w).min(half_h);
    let qx = dx.abs() - half_w + radius;
    let qy = dy.abs() - half_h + radius;
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}
