//! Synthetic scenes shared by the integration tests
#![allow(dead_code)]

use emblem_scan::{Image, PixelFormat};
use std::ops::Range;

/// Red backdrop; matches none of the default colour ranges
pub const BACKDROP: [u8; 3] = [0, 0, 130];
/// Bright field around the lobes; lands in the ring range
pub const FIELD: [u8; 3] = [210, 210, 210];
/// Lobe blue (B, G, R)
pub const LOBE: [u8; 3] = [150, 100, 20];
/// Mid gray between the lobes; lands in the inner range
pub const INNER: [u8; 3] = [100, 100, 100];

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Colour image filled with [`BACKDROP`]
pub fn canvas(width: usize, height: usize) -> Image {
    Image::from_raw(width, height, 3, BACKDROP.repeat(width * height)).unwrap()
}

pub fn paint(image: &mut Image, rows: Range<usize>, cols: Range<usize>, color: [u8; 3]) {
    assert_eq!(image.format(), PixelFormat::Color);
    for y in rows {
        for x in cols.clone() {
            image.set_pixel(x, y, &color);
        }
    }
}

/// Paint a 100x100 emblem whose field starts at column `ox`, row `oy`.
///
/// Lobes fill the top-left and bottom-right 30x30 quadrants of the central
/// 60x60 square and touch only at a corner; the other two quadrants hold a
/// 24x24 inner-colour patch each.
pub fn paint_emblem(image: &mut Image, ox: usize, oy: usize) {
    paint(image, oy..oy + 100, ox..ox + 100, FIELD);
    paint(image, oy + 20..oy + 50, ox + 20..ox + 50, LOBE);
    paint(image, oy + 50..oy + 80, ox + 50..ox + 80, LOBE);
    paint(image, oy + 23..oy + 47, ox + 53..ox + 77, INNER);
    paint(image, oy + 53..oy + 77, ox + 23..ox + 47, INNER);
}

/// 200x200 scene with one emblem centred in it
pub fn emblem_scene() -> Image {
    let mut image = canvas(200, 200);
    paint_emblem(&mut image, 50, 50);
    image
}
