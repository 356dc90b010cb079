//! Per-channel range thresholding into 0/255 masks

use crate::error::Result;
use crate::models::{ColorRange, Image, PixelFormat};
use rayon::prelude::*;

/// Foreground label written into masks
pub const FOREGROUND: u8 = 255;
/// Background label written into masks
pub const BACKGROUND: u8 = 0;

/// Build a mask that is 255 where every channel lies inside `range`.
///
/// For 1-channel images only the first bound is used.
pub fn in_range(image: &Image, range: &ColorRange) -> Result<Image> {
    let channels = image.channels();
    let mut mask = image.blank_like(PixelFormat::Gray);
    let width = image.width();

    mask.as_bytes_mut()
        .par_chunks_mut(width)
        .zip(image.as_bytes().par_chunks(image.stride()))
        .for_each(|(dst, src)| {
            for (d, px) in dst.iter_mut().zip(src.chunks_exact(channels)) {
                *d = if range.contains(px) {
                    FOREGROUND
                } else {
                    BACKGROUND
                };
            }
        });

    Ok(mask)
}
