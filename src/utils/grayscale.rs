//! Luminance conversion for B, G, R images
//!
//! Y = 0.299*R + 0.587*G + 0.114*B, rounded to the nearest integer.

use crate::error::Result;
use crate::models::{Image, PixelFormat};
use crate::utils::pixel_ops::clamp_f32;
use rayon::prelude::*;

/// Weight of the blue channel
pub const GRAY_B: f32 = 0.114;
/// Weight of the green channel
pub const GRAY_G: f32 = 0.587;
/// Weight of the red channel
pub const GRAY_R: f32 = 0.299;

/// Luminance of one stored (B, G, R) pixel
#[inline]
pub fn luminance(b: u8, g: u8, r: u8) -> u8 {
    clamp_f32((b as f32 * GRAY_B + g as f32 * GRAY_G + r as f32 * GRAY_R).round())
}

/// Convert a colour image to a 1-channel luminance image
pub fn to_grayscale(image: &Image) -> Result<Image> {
    image.require("to_grayscale", PixelFormat::Color)?;

    let mut gray = image.blank_like(PixelFormat::Gray);
    let width = image.width();
    gray.as_bytes_mut()
        .par_chunks_mut(width)
        .zip(image.as_bytes().par_chunks(image.stride()))
        .for_each(|(row, src)| {
            for (dst, px) in row.iter_mut().zip(src.chunks_exact(3)) {
                *dst = luminance(px[0], px[1], px[2]);
            }
        });

    Ok(gray)
}
