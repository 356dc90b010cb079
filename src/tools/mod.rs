//! Collaborator-side helpers: decoding files into B, G, R images, overlays,
//! dataset iteration and mask statistics. The detection core never touches
//! the filesystem.

use crate::error::{EmblemError, Result};
use crate::models::{Detection, Image, PixelFormat, Rect};
use crate::utils::threshold::FOREGROUND;
use image::GenericImageView;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Overlay colour (B, G, R)
pub const OVERLAY_COLOR: [u8; 3] = [0, 0, 255];

fn max_dim_from_env() -> Option<u32> {
    match env::var("EMBLEM_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image file as a 3-channel B, G, R [`Image`].
///
/// When `EMBLEM_MAX_DIM` is set, inputs whose longer side exceeds it are
/// downsized first.
pub fn load_bgr<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| EmblemError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgb8(),
        _ => img.to_rgb8(),
    };
    let (width, height) = rgb.dimensions();
    let mut data = rgb.into_raw();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    Image::from_raw(width as usize, height as usize, 3, data)
}

/// Write an image to disk; the file extension picks the encoder.
///
/// Color images are taken as B, G, R; masks are written as grayscale.
pub fn save_image<P: AsRef<Path>>(path: P, source: &Image) -> Result<()> {
    let path = path.as_ref();
    let (w, h) = (source.width() as u32, source.height() as u32);
    let result = match source.format() {
        PixelFormat::Color => image::RgbImage::from_fn(w, h, |x, y| {
            let px = source.pixel(x as usize, y as usize);
            image::Rgb([px[2], px[1], px[0]])
        })
        .save(path),
        PixelFormat::Gray => {
            image::GrayImage::from_fn(w, h, |x, y| image::Luma([source.get(x as usize, y as usize)]))
                .save(path)
        }
    };
    result.map_err(|source| EmblemError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

fn draw_rect(canvas: &mut Image, rect: &Rect, color: &[u8; 3]) {
    let r = rect.clamp_to(canvas.width(), canvas.height());
    if r.width == 0 || r.height == 0 {
        return;
    }
    let (x0, y0) = (r.x, r.y);
    let (x1, y1) = (r.right() - 1, r.bottom() - 1);
    for x in x0..=x1 {
        canvas.set_pixel(x, y0, color);
        canvas.set_pixel(x, y1, color);
    }
    for y in y0..=y1 {
        canvas.set_pixel(x0, y, color);
        canvas.set_pixel(x1, y, color);
    }
}

/// Copy of `image` with a 1-pixel outline around every detection
pub fn draw_detections(image: &Image, detections: &[Detection]) -> Result<Image> {
    image.require("draw_detections", PixelFormat::Color)?;
    let mut canvas = image.clone();
    for detection in detections {
        draw_rect(&mut canvas, &detection.rect, &OVERLAY_COLOR);
    }
    Ok(canvas)
}

/// Summary statistics for a binary mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskStats {
    /// Count of foreground pixels.
    pub foreground: usize,
    /// Total pixels in the mask.
    pub total: usize,
    /// Ratio of foreground pixels to total pixels.
    pub ratio: f64,
}

/// Compute foreground pixel stats for a binary mask.
pub fn mask_stats(mask: &Image) -> MaskStats {
    let foreground = mask.count(FOREGROUND);
    let total = mask.width() * mask.height();
    MaskStats {
        foreground,
        total,
        ratio: foreground as f64 / total as f64,
    }
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("EMBLEM_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images"))
}

/// Default file limit from environment variables.
///
/// Returns `None` (full dataset) when `EMBLEM_LIMIT` is unset or set to `0`.
pub fn limit_from_env() -> Option<usize> {
    match env::var("EMBLEM_LIMIT") {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|v| if v == 0 { None } else { Some(v) }),
        Err(_) => None,
    }
}

/// Iterate dataset image paths in sorted order, optionally truncated.
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp"))
}

fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_image_path(&path) {
                images.push(path);
            }
        }
    }

    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before UNIX epoch")
            .as_nanos();
        let sequence = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = env::temp_dir().join(format!("emblem_scan_tools_{nanos}_{sequence}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn test_save_then_load_keeps_channel_order() {
        let dir = temp_dir();
        let mut img = Image::new(4, 3, PixelFormat::Color).unwrap();
        img.set_pixel(2, 1, &[150, 100, 20]);
        let path = dir.join("pixel.png");

        save_image(&path, &img).unwrap();
        let loaded = load_bgr(&path).unwrap();
        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.pixel(2, 1), &[150, 100, 20]);
        assert_eq!(loaded.pixel(0, 0), &[0, 0, 0]);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let err = load_bgr("/nonexistent/emblem.png").unwrap_err();
        assert!(matches!(err, EmblemError::ImageLoad { .. }));
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("/nonexistent/emblem.png"));
    }

    #[test]
    fn test_draw_detections_outlines_rect() {
        let img = Image::new(10, 10, PixelFormat::Color).unwrap();
        let detection = Detection {
            rect: Rect::new(2, 3, 4, 5),
            ring_compactness: 1.0,
            fill_ratio: 0.3,
        };
        let out = draw_detections(&img, &[detection]).unwrap();
        assert_eq!(out.pixel(2, 3), &OVERLAY_COLOR);
        assert_eq!(out.pixel(5, 7), &OVERLAY_COLOR);
        assert_eq!(out.pixel(3, 5), &[0, 0, 0]);
        assert_eq!(out.pixel(6, 3), &[0, 0, 0]);
        // source untouched
        assert_eq!(img.pixel(2, 3), &[0, 0, 0]);
    }

    #[test]
    fn test_mask_stats() {
        let mut mask = Image::new(4, 4, PixelFormat::Gray).unwrap();
        mask.set(1, 1, FOREGROUND);
        mask.set(2, 2, FOREGROUND);
        let stats = mask_stats(&mask);
        assert_eq!(stats.foreground, 2);
        assert_eq!(stats.total, 16);
        assert!((stats.ratio - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_dataset_iter_sorts_and_limits() {
        let dir = temp_dir();
        fs::create_dir_all(dir.join("nested")).unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "nested/c.bmp"] {
            fs::write(dir.join(name), b"").unwrap();
        }

        let all: Vec<_> = dataset_iter(&dir, None).collect();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0] <= w[1]));

        let limited: Vec<_> = dataset_iter(&dir, Some(1)).collect();
        assert_eq!(limited, vec![dir.join("a.jpg")]);

        let _ = fs::remove_dir_all(dir);
    }
}
