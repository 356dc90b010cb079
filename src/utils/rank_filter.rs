//! Vector-valued order-statistic filter
//!
//! Each neighbour is ranked by the sum of its three channels and the whole
//! colour vector of the selected neighbour is copied, so the output never
//! contains a colour that was not present in the input.

use crate::error::{EmblemError, Result};
use crate::models::{Image, PixelFormat};
use rayon::prelude::*;

/// Check kernel/rank arguments without touching an image
pub fn validate_rank_args(kernel_size: usize, index: usize) -> Result<()> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(EmblemError::InvalidKernel(kernel_size));
    }
    if index >= kernel_size * kernel_size {
        return Err(EmblemError::RankOutOfRange {
            index,
            kernel: kernel_size,
        });
    }
    Ok(())
}

/// Apply a `kernel_size` x `kernel_size` rank filter selecting the
/// `index`-th smallest neighbour by channel sum.
///
/// Ties are broken by row-major position inside the window. The border of
/// width `kernel_size / 2` is left zeroed.
pub fn rank_filter(image: &Image, kernel_size: usize, index: usize) -> Result<Image> {
    image.require("rank_filter", PixelFormat::Color)?;
    validate_rank_args(kernel_size, index)?;

    let offset = kernel_size / 2;
    let width = image.width();
    let height = image.height();
    let stride = image.stride();
    let mut out = image.blank_like(PixelFormat::Color);

    if width <= 2 * offset || height <= 2 * offset {
        return Ok(out);
    }

    out.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .filter(|(y, _)| *y >= offset && *y < height - offset)
        .for_each_init(
            || Vec::with_capacity(kernel_size * kernel_size),
            |window: &mut Vec<(u16, usize)>, (y, row)| {
                for x in offset..width - offset {
                    window.clear();
                    for wy in y - offset..=y + offset {
                        for wx in x - offset..=x + offset {
                            let px = image.pixel(wx, wy);
                            let key = px[0] as u16 + px[1] as u16 + px[2] as u16;
                            window.push((key, wy * width + wx));
                        }
                    }
                    // Linear position is unique and increases row-major, so it
                    // doubles as the tie-break.
                    let (_, &mut (_, winner), _) = window.select_nth_unstable(index);
                    let src = image.pixel(winner % width, winner / width);
                    row[x * 3..x * 3 + 3].copy_from_slice(src);
                }
            },
        );

    Ok(out)
}
