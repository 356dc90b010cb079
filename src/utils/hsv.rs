//! B, G, R to H, S, V conversion with OpenCV-style 8-bit scaling
//!
//! H is halved to fit [0, 180]; S and V are scaled to [0, 255].

use crate::error::Result;
use crate::models::{Image, PixelFormat};
use crate::utils::pixel_ops::clamp_f32;
use rayon::prelude::*;

/// Which stored channel holds the extreme value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Blue,
    Green,
    Red,
}

/// Pick the maximum channel: B against G first, then the winner against R.
/// Ties keep the earlier candidate.
fn max_channel(b: f32, g: f32, r: f32) -> (Channel, f32) {
    let (ch, v) = if b >= g {
        (Channel::Blue, b)
    } else {
        (Channel::Green, g)
    };
    if r > v { (Channel::Red, r) } else { (ch, v) }
}

/// Minimum counterpart of [`max_channel`] with the same comparison order
fn min_channel(b: f32, g: f32, r: f32) -> f32 {
    let v = if b <= g { b } else { g };
    if r < v { r } else { v }
}

/// Convert one stored (B, G, R) pixel to 8-bit (H, S, V)
pub fn bgr_to_hsv(b: u8, g: u8, r: u8) -> [u8; 3] {
    let b = b as f32 / 255.0;
    let g = g as f32 / 255.0;
    let r = r as f32 / 255.0;

    let (max_ch, v) = max_channel(b, g, r);
    let min = min_channel(b, g, r);
    let delta = v - min;

    let s = if v == 0.0 { 0.0 } else { delta / v };

    // Achromatic pixels have no defined hue
    let mut h = if delta == 0.0 {
        0.0
    } else {
        match max_ch {
            Channel::Red => 60.0 * (g - b) / delta,
            Channel::Green => 120.0 + 60.0 * (b - r) / delta,
            Channel::Blue => 240.0 + 60.0 * (r - g) / delta,
        }
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        clamp_f32((h / 2.0).round()),
        clamp_f32((s * 255.0).round()),
        clamp_f32((v * 255.0).round()),
    ]
}

/// Convert a colour image to HSV
pub fn to_hsv(image: &Image) -> Result<Image> {
    image.require("to_hsv", PixelFormat::Color)?;

    let mut hsv = image.blank_like(PixelFormat::Color);
    let stride = image.stride();
    hsv.as_bytes_mut()
        .par_chunks_mut(stride)
        .zip(image.as_bytes().par_chunks(stride))
        .for_each(|(dst, src)| {
            for (out, px) in dst.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
                out.copy_from_slice(&bgr_to_hsv(px[0], px[1], px[2]));
            }
        });

    Ok(hsv)
}
