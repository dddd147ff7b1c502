//! Piece extraction and cutout shading.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::pixelops::interpolate;

use super::geometry::{PieceShape, Placement, TAB_RADIUS};
use super::similarity::OPACITY_GATE;

/// Stroke width of the light outline around the piece and the cutout.
pub const OUTLINE_WIDTH: f32 = 2.0;

const OUTLINE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE_OPACITY: f32 = 200.0 / 255.0;
const SHADE_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const SHADE_OPACITY: f32 = 80.0 / 255.0;
/// Alpha of the piece rim. Must stay below the similarity opacity gate.
const RIM_ALPHA: u8 = OPACITY_GATE - 10;

/// Extracts the piece at `placement` as a standalone image.
///
/// The result is `(piece_width + TAB_RADIUS) x piece_height`. Interior pixels
/// carry the original colors at full opacity. The `OUTLINE_WIDTH` rim inside
/// the silhouette edge carries the outline at an alpha below the similarity
/// opacity gate, so rim pixels are excluded from scoring and the opaque
/// region is the silhouette eroded by the rim. Everything outside the
/// silhouette is fully transparent.
#[must_use]
pub fn cut_piece(
    original: &RgbImage,
    placement: Placement,
    piece_width: u32,
    piece_height: u32,
) -> RgbaImage {
    let shape = PieceShape::new(0, 0, piece_width, piece_height);
    let mut piece = RgbaImage::new(piece_width.saturating_add(TAB_RADIUS), piece_height);

    for (col, row, pixel) in piece.enumerate_pixels_mut() {
        let distance = shape.pixel_distance(col, row);
        if distance >= 0.0 {
            continue;
        }
        let Some(&Rgb([r, g, b])) =
            original.get_pixel_checked(placement.x + col, placement.y + row)
        else {
            continue;
        };

        *pixel = if distance > -OUTLINE_WIDTH {
            let Rgb([r, g, b]) = interpolate(OUTLINE_COLOR, Rgb([r, g, b]), OUTLINE_OPACITY);
            Rgba([r, g, b, RIM_ALPHA])
        } else {
            Rgba([r, g, b, u8::MAX])
        };
    }

    piece
}

/// Shades the piece-shaped hole into `background` in place.
///
/// Pixels under the silhouette are dimmed, not erased, and a light outline is
/// stroked over the silhouette edge.
pub fn draw_cutout(
    background: &mut RgbImage,
    placement: Placement,
    piece_width: u32,
    piece_height: u32,
) {
    let shape = PieceShape::at(placement, piece_width, piece_height);
    let (width, height) = background.dimensions();
    let (x0, y0, x1, y1) = shape.bounds();
    let half_stroke = OUTLINE_WIDTH / 2.0;

    // One pixel of slack for the outer half of the stroke.
    for row in y0.saturating_sub(1)..(y1 + 1).min(height) {
        for col in x0.saturating_sub(1)..(x1 + 1).min(width) {
            let distance = shape.pixel_distance(col, row);
            let pixel = background.get_pixel_mut(col, row);
            if distance < 0.0 {
                *pixel = interpolate(SHADE_COLOR, *pixel, SHADE_OPACITY);
            }
            if distance.abs() <= half_stroke {
                *pixel = interpolate(OUTLINE_COLOR, *pixel, OUTLINE_OPACITY);
            }
        }
    }
}
