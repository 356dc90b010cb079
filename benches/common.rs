use emblem_scan::Image;
use emblem_scan::tools::{dataset_iter, dataset_root_from_env, limit_from_env};
use std::path::PathBuf;

#[allow(dead_code)]
pub fn collect_dataset_images() -> (PathBuf, Vec<PathBuf>) {
    let root = dataset_root_from_env();
    let images: Vec<PathBuf> = dataset_iter(&root, limit_from_env()).collect();
    (root, images)
}

/// Scene of `width` x `height` with a 100x100 emblem tiled every 200 pixels
pub fn emblem_scene(width: usize, height: usize) -> Image {
    let mut data = [0u8, 0, 130].repeat(width * height);
    let mut paint = |rows: std::ops::Range<usize>, cols: std::ops::Range<usize>, color: [u8; 3]| {
        for y in rows.filter(|&y| y < height) {
            for x in cols.clone().filter(|&x| x < width) {
                let i = (y * width + x) * 3;
                data[i..i + 3].copy_from_slice(&color);
            }
        }
    };
    for oy in (50..height).step_by(200) {
        for ox in (50..width).step_by(200) {
            paint(oy..oy + 100, ox..ox + 100, [210, 210, 210]);
            paint(oy + 20..oy + 50, ox + 20..ox + 50, [150, 100, 20]);
            paint(oy + 50..oy + 80, ox + 50..ox + 80, [150, 100, 20]);
            paint(oy + 23..oy + 47, ox + 53..ox + 77, [100, 100, 100]);
            paint(oy + 53..oy + 77, ox + 23..ox + 47, [100, 100, 100]);
        }
    }
    Image::from_raw(width, height, 3, data).expect("synthetic scene has a valid layout")
}
