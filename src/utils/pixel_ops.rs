//! Saturating per-channel arithmetic
//!
//! Every operation returns a new image; the input is only read.

use crate::models::Image;
use rayon::prelude::*;

/// Largest channel value
pub const MAX_VAL: i32 = 255;
/// Smallest channel value
pub const MIN_VAL: i32 = 0;

/// Saturate an integer to [0, 255]
pub fn clamp(value: i32) -> u8 {
    value.clamp(MIN_VAL, MAX_VAL) as u8
}

/// Saturate a float to [0, 255], truncating the fraction. NaN maps to 0.
pub fn clamp_f32(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(MIN_VAL as f32, MAX_VAL as f32) as u8
}

/// Multiply every channel by `factor`, then saturate
pub fn adjust_contrast(image: &Image, factor: f32) -> Image {
    map_channels(image, |v| clamp_f32(v as f32 * factor))
}

/// Add `delta` to every channel, then saturate
pub fn adjust_brightness(image: &Image, delta: i32) -> Image {
    map_channels(image, |v| clamp(v as i32 + delta))
}

fn map_channels<F>(image: &Image, op: F) -> Image
where
    F: Fn(u8) -> u8 + Sync,
{
    let mut out = image.blank_like(image.format());
    let stride = image.stride();
    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .zip(image.as_bytes().par_chunks(stride))
        .for_each(|(dst, src)| {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = op(s);
            }
        });
    out
}
