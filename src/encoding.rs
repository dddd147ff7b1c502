//! PNG and data URI encoding for challenge images.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{EncodableLayout, ImageBuffer, ImageFormat, Pixel, PixelWithColorType};

use crate::config::Result;

/// Encodes an image as PNG.
///
/// # Errors
///
/// Returns an error if the PNG encoder rejects the image.
pub fn png_bytes<P>(image: &ImageBuffer<P, Vec<P::Subpixel>>) -> Result<Vec<u8>>
where
    P: Pixel + PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Encodes an image as a `data:image/png;base64,...` URI.
///
/// # Errors
///
/// Returns an error if the PNG encoder rejects the image.
pub fn png_data_uri<P>(image: &ImageBuffer<P, Vec<P::Subpixel>>) -> Result<String>
where
    P: Pixel + PixelWithColorType,
    [P::Subpixel]: EncodableLayout,
{
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(png_bytes(image)?)
    ))
}
