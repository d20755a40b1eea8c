//! Placeholder cover image.
//!
//! kindlegen requires a cover for periodicals. When the caller has none,
//! a plain white GIF of the standard Kindle cover size is used instead.

use crate::error::PeriodicalError;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use tracing::{debug, instrument};

/// Width of the generated cover, in pixels.
pub const COVER_WIDTH: u32 = 600;
/// Height of the generated cover, in pixels.
pub const COVER_HEIGHT: u32 = 800;

/// Encode a solid white 600×800 GIF.
///
/// The image holds a single colour, so the encoder's palette collapses to
/// that one entry.
#[instrument(level = "debug")]
pub fn blank_cover() -> Result<Vec<u8>, PeriodicalError> {
    let img = RgbaImage::from_pixel(COVER_WIDTH, COVER_HEIGHT, Rgba([255, 255, 255, 255]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img).write_to(&mut Cursor::new(&mut buf), ImageFormat::Gif)?;
    debug!(bytes = buf.len(), "Encoded blank cover");
    Ok(buf)
}
