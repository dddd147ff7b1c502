//! Background provisioning.
//!
//! Resolves a canvas-sized base image through a fallback chain: an external
//! file, then the named built-in, then a random built-in, and finally a
//! procedurally synthesized image. The last step cannot fail.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::{
    Blend, Canvas, draw_cubic_bezier_curve_mut, draw_filled_circle_mut, draw_filled_rect_mut,
};
use imageproc::pixelops::interpolate;
use imageproc::rect::Rect;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::{CaptchaError, Config, Result};

const SHAPE_COUNT_MIN: u32 = 10;
const SHAPE_COUNT_MAX: u32 = 15;
const SHAPE_SIZE_MIN: i32 = 20;
const SHAPE_SIZE_MAX: i32 = 70;
const SHAPE_ALPHA_MIN: u8 = 50;
const SHAPE_ALPHA_MAX: u8 = 150;
const SHAPE_CORNER_RADIUS: i32 = 5;
const CURVE_COUNT: usize = 3;
const CURVE_ALPHA: u8 = 35;
const LIGHT_CHANNEL_MIN: u8 = 200;

/// Bundled background images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinBackground {
    BlueGradient,
    GreenNature,
    PurpleDream,
    OrangeWarm,
    PinkRomantic,
    RedGradient,
    CyanGradient,
    YellowGradient,
}

impl BuiltinBackground {
    pub const ALL: [Self; 8] = [
        Self::BlueGradient,
        Self::GreenNature,
        Self::PurpleDream,
        Self::OrangeWarm,
        Self::PinkRomantic,
        Self::RedGradient,
        Self::CyanGradient,
        Self::YellowGradient,
    ];

    /// Canonical snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BlueGradient => "blue_gradient",
            Self::GreenNature => "green_nature",
            Self::PurpleDream => "purple_dream",
            Self::OrangeWarm => "orange_warm",
            Self::PinkRomantic => "pink_romantic",
            Self::RedGradient => "red_gradient",
            Self::CyanGradient => "cyan_gradient",
            Self::YellowGradient => "yellow_gradient",
        }
    }

    /// Path of the bundled asset, relative to the asset root.
    #[must_use]
    pub const fn resource_key(self) -> &'static str {
        match self {
            Self::BlueGradient => "backgrounds/blue_gradient.png",
            Self::GreenNature => "backgrounds/green_nature.png",
            Self::PurpleDream => "backgrounds/purple_dream.png",
            Self::OrangeWarm => "backgrounds/orange_warm.png",
            Self::PinkRomantic => "backgrounds/pink_romantic.png",
            Self::RedGradient => "backgrounds/red_gradient.png",
            Self::CyanGradient => "backgrounds/cyan_gradient.png",
            Self::YellowGradient => "backgrounds/yellow_gradient.png",
        }
    }

    const fn bytes(self) -> &'static [u8] {
        match self {
            Self::BlueGradient => include_bytes!("../../assets/backgrounds/blue_gradient.png"),
            Self::GreenNature => include_bytes!("../../assets/backgrounds/green_nature.png"),
            Self::PurpleDream => include_bytes!("../../assets/backgrounds/purple_dream.png"),
            Self::OrangeWarm => include_bytes!("../../assets/backgrounds/orange_warm.png"),
            Self::PinkRomantic => include_bytes!("../../assets/backgrounds/pink_romantic.png"),
            Self::RedGradient => include_bytes!("../../assets/backgrounds/red_gradient.png"),
            Self::CyanGradient => include_bytes!("../../assets/backgrounds/cyan_gradient.png"),
            Self::YellowGradient => include_bytes!("../../assets/backgrounds/yellow_gradient.png"),
        }
    }

    /// Picks one built-in uniformly at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Decodes the bundled image and rescales it to `width`x`height`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled image cannot be decoded.
    pub fn load(self, width: u32, height: u32) -> Result<RgbImage> {
        let image = image::load_from_memory(self.bytes())?;
        Ok(fit(&image, width, height))
    }
}

impl fmt::Display for BuiltinBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinBackground {
    type Err = CaptchaError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|bg| bg.name() == normalized)
            .ok_or_else(|| CaptchaError::UnknownBackground(s.to_string()))
    }
}

// Aspect ratio is not preserved.
fn fit(image: &DynamicImage, width: u32, height: u32) -> RgbImage {
    image
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8()
}

/// Loads an external image and rescales it to `width`x`height`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn load_path(path: &Path, width: u32, height: u32) -> Result<RgbImage> {
    let image = image::open(path)?;
    Ok(fit(&image, width, height))
}

/// Resolves the base image for one challenge.
///
/// Each failed source is logged and skipped.
pub fn resolve(config: &Config, rng: &mut impl Rng) -> RgbImage {
    let (width, height) = (config.width, config.height);

    if let Some(path) = &config.background_path {
        match load_path(path, width, height) {
            Ok(image) => return image,
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping external background"),
        }
    }

    if let Some(builtin) = config.builtin_background {
        match builtin.load(width, height) {
            Ok(image) => return image,
            Err(e) => warn!(background = %builtin, error = %e, "Skipping built-in background"),
        }
    }

    let builtin = BuiltinBackground::random(rng);
    match builtin.load(width, height) {
        Ok(image) => {
            debug!(background = %builtin, "Using random built-in background");
            return image;
        }
        Err(e) => warn!(background = %builtin, error = %e, "Skipping built-in background"),
    }

    debug!(width, height, "Synthesizing background");
    synthesize(width, height, rng)
}

fn light_color(rng: &mut impl Rng) -> Rgb<u8> {
    Rgb([
        rng.random_range(LIGHT_CHANNEL_MIN..=u8::MAX),
        rng.random_range(LIGHT_CHANNEL_MIN..=u8::MAX),
        rng.random_range(LIGHT_CHANNEL_MIN..=u8::MAX),
    ])
}

#[inline]
fn signed(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Draws a procedural background: a diagonal gradient between two light
/// colors, translucent shapes and a few interference curves.
#[allow(clippy::cast_precision_loss)]
pub fn synthesize(width: u32, height: u32, rng: &mut impl Rng) -> RgbImage {
    if width == 0 || height == 0 {
        return RgbImage::new(width, height);
    }

    let start = light_color(rng);
    let end = light_color(rng);
    let (w, h) = (width as f32, height as f32);
    let length_sq = w.mul_add(w, h * h);
    let gradient = RgbaImage::from_fn(width, height, |x, y| {
        let t = ((x as f32).mul_add(w, y as f32 * h) / length_sq).clamp(0.0, 1.0);
        let Rgb([r, g, b]) = interpolate(end, start, t);
        Rgba([r, g, b, u8::MAX])
    });

    let mut canvas = Blend(gradient);
    draw_shapes(&mut canvas, rng);
    draw_curves(&mut canvas, rng);

    DynamicImage::ImageRgba8(canvas.0).to_rgb8()
}

fn draw_shapes(canvas: &mut Blend<RgbaImage>, rng: &mut impl Rng) {
    let (width, height) = canvas.dimensions();
    let (w, h) = (signed(width), signed(height));

    for _ in 0..rng.random_range(SHAPE_COUNT_MIN..=SHAPE_COUNT_MAX) {
        let color = Rgba([
            rng.random(),
            rng.random(),
            rng.random(),
            rng.random_range(SHAPE_ALPHA_MIN..SHAPE_ALPHA_MAX),
        ]);
        let x = rng.random_range(0..w);
        let y = rng.random_range(0..h);
        let size = rng.random_range(SHAPE_SIZE_MIN..SHAPE_SIZE_MAX);

        match rng.random_range(0..3) {
            0 => {
                let radius = size / 2;
                draw_filled_circle_mut(canvas, (x + radius, y + radius), radius, color);
            }
            1 => {
                let side = size.unsigned_abs();
                draw_filled_rect_mut(canvas, Rect::at(x, y).of_size(side, side), color);
            }
            _ => draw_rounded_square(canvas, x, y, size, color),
        }
    }
}

fn draw_rounded_square(canvas: &mut Blend<RgbaImage>, x: i32, y: i32, size: i32, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    let r = SHAPE_CORNER_RADIUS;
    for dy in 0..size {
        for dx in 0..size {
            let cx = dx.clamp(r, size - 1 - r);
            let cy = dy.clamp(r, size - 1 - r);
            if (dx - cx).pow(2) + (dy - cy).pow(2) > r * r {
                continue;
            }
            let (Ok(px), Ok(py)) = (u32::try_from(x + dx), u32::try_from(y + dy)) else {
                continue;
            };
            if px < width && py < height {
                canvas.draw_pixel(px, py, color);
            }
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn draw_curves(canvas: &mut Blend<RgbaImage>, rng: &mut impl Rng) {
    let (width, height) = canvas.dimensions();
    let (w, h) = (width as f32, height as f32);

    for _ in 0..CURVE_COUNT {
        let start = (rng.random_range(0.0..w), rng.random_range(0.0..h));
        let end = (rng.random_range(0.0..w), rng.random_range(0.0..h));
        let control = (rng.random_range(0.0..w), rng.random_range(0.0..h));
        let color = Rgba([rng.random(), rng.random(), rng.random(), CURVE_ALPHA]);

        // Quadratic curve expressed with cubic control points.
        let lift = |p: (f32, f32)| {
            (
                (control.0 - p.0).mul_add(2.0 / 3.0, p.0),
                (control.1 - p.1).mul_add(2.0 / 3.0, p.1),
            )
        };
        draw_cubic_bezier_curve_mut(canvas, start, end, lift(start), lift(end), color);
    }
}
