//! Connected-region extraction on label masks
//!
//! Flood fill, xor and or all skip the outermost 1-pixel frame of the mask.
//! Objects touching the image edge are therefore never fully labelled; the
//! frame pixels of such objects stay with the working mask.

use std::collections::VecDeque;

use crate::error::{EmblemError, FillRefusal, Result};
use crate::models::{Image, PixelCoord, PixelFormat};

/// Outcome of a flood fill
#[derive(Debug, Clone)]
pub struct FloodFill {
    /// Copy of the input with the filled region relabelled
    pub mask: Image,
    /// Number of relabelled pixels, seed included
    pub area: usize,
}

/// 4-connected breadth-first flood fill from `seed`.
///
/// Neighbours are visited west, east, north, south and are only entered when
/// they lie strictly inside the frame. The input mask is left untouched.
pub fn flood_fill(mask: &Image, seed: PixelCoord, target: u8, replacement: u8) -> Result<FloodFill> {
    let mut out = mask.clone();
    let filled = fill_in_place(&mut out, seed, target, replacement)?;
    Ok(FloodFill {
        mask: out,
        area: filled.len(),
    })
}

/// Relabel the region in place and return its pixels in visiting order
pub(crate) fn fill_in_place(
    mask: &mut Image,
    seed: PixelCoord,
    target: u8,
    replacement: u8,
) -> Result<Vec<PixelCoord>> {
    mask.require("flood_fill", PixelFormat::Gray)?;
    if target == replacement {
        return Err(EmblemError::FillNotApplicable(FillRefusal::SameColor));
    }
    if seed.x >= mask.width() || seed.y >= mask.height() {
        return Err(EmblemError::FillNotApplicable(FillRefusal::SeedOutOfBounds));
    }
    if mask.get(seed.x, seed.y) != target {
        return Err(EmblemError::FillNotApplicable(FillRefusal::SeedNotTarget));
    }

    let mut filled = vec![seed];
    let mut queue = VecDeque::new();
    mask.set(seed.x, seed.y, replacement);
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        for next in current.neighbors4() {
            if mask.is_interior(next.x, next.y) && mask.get(next.x, next.y) == target {
                mask.set(next.x, next.y, replacement);
                filled.push(next);
                queue.push_back(next);
            }
        }
    }

    Ok(filled)
}

/// Pixelwise xor of two masks over the interior; the frame is zeroed
pub fn bitwise_xor(a: &Image, b: &Image) -> Result<Image> {
    combine_interior(a, b, "bitwise_xor", |x, y| x ^ y)
}

/// Pixelwise or of two masks over the interior; the frame is zeroed
pub fn bitwise_or(a: &Image, b: &Image) -> Result<Image> {
    combine_interior(a, b, "bitwise_or", |x, y| x | y)
}

fn combine_interior<F>(a: &Image, b: &Image, operation: &'static str, op: F) -> Result<Image>
where
    F: Fn(u8, u8) -> u8,
{
    a.require(operation, PixelFormat::Gray)?;
    b.require(operation, PixelFormat::Gray)?;
    a.require_same_size(b)?;

    let mut out = a.blank_like(PixelFormat::Gray);
    for y in 1..a.height().saturating_sub(1) {
        for x in 1..a.width().saturating_sub(1) {
            out.set(x, y, op(a.get(x, y), b.get(x, y)));
        }
    }
    Ok(out)
}

/// Isolate every connected region of `color` whose fill area exceeds
/// `min_area`.
///
/// The mask is scanned row-major. Each untouched `color` pixel seeds a fill
/// to `background` on a single working copy. A qualifying region is the xor
/// of the working mask before and after its fill, so its pixels carry
/// `color ^ background` and the frame stays zero.
pub fn extract_objects(mask: &Image, color: u8, background: u8, min_area: usize) -> Result<Vec<Image>> {
    mask.require("extract_objects", PixelFormat::Gray)?;

    let mut working = mask.clone();
    let mut objects = Vec::new();

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if working.get(x, y) != color {
                continue;
            }
            let filled = fill_in_place(&mut working, PixelCoord::new(x, y), color, background)?;
            if filled.len() <= min_area {
                continue;
            }
            let mut object = mask.blank_like(PixelFormat::Gray);
            for p in filled.iter().filter(|p| mask.is_interior(p.x, p.y)) {
                object.set(p.x, p.y, color ^ background);
            }
            objects.push(object);
        }
    }

    Ok(objects)
}
