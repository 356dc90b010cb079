//! Shape descriptors of labelled regions
//!
//! Moments use `i` = row and `j` = column: `m_pq = sum(i^p * j^q)`.

use std::f64::consts::PI;

use crate::error::{EmblemError, Result};
use crate::models::{Image, PixelFormat, Point, Rect};

/// Number of pixels equal to `color`
pub fn area(mask: &Image, color: u8) -> Result<usize> {
    mask.require("area", PixelFormat::Gray)?;
    Ok(mask.count(color))
}

/// Number of pixels equal to `color` inside `rect`
pub fn area_in(mask: &Image, rect: &Rect, color: u8) -> Result<usize> {
    mask.require("area_in", PixelFormat::Gray)?;
    let rect = rect.clamp_to(mask.width(), mask.height());
    let mut count = 0usize;
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            if mask.get(x, y) == color {
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Interior `color` pixels with at least one 4-neighbour equal to `background`
pub fn perimeter(mask: &Image, color: u8, background: u8) -> Result<usize> {
    mask.require("perimeter", PixelFormat::Gray)?;
    let mut count = 0usize;
    for y in 1..mask.height().saturating_sub(1) {
        for x in 1..mask.width().saturating_sub(1) {
            if mask.get(x, y) != color {
                continue;
            }
            let edge = mask.get(x - 1, y) == background
                || mask.get(x + 1, y) == background
                || mask.get(x, y - 1) == background
                || mask.get(x, y + 1) == background;
            if edge {
                count += 1;
            }
        }
    }
    Ok(count)
}

/// Raw moment `sum(i^p * j^q)` over pixels equal to `color`
pub fn raw_moment(mask: &Image, p: i32, q: i32, color: u8) -> Result<f64> {
    mask.require("raw_moment", PixelFormat::Gray)?;
    let mut sum = 0.0f64;
    for i in 0..mask.height() {
        for j in 0..mask.width() {
            if mask.get(j, i) == color {
                sum += (i as f64).powi(p) * (j as f64).powi(q);
            }
        }
    }
    Ok(sum)
}

/// Raw moments up to second order of a non-empty region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m02: f64,
    pub m11: f64,
}

impl Moments {
    /// Accumulate all moments in one scan. Fails on an empty region.
    pub fn of(mask: &Image, color: u8) -> Result<Self> {
        mask.require("moments", PixelFormat::Gray)?;
        let mut m = Moments {
            m00: 0.0,
            m10: 0.0,
            m01: 0.0,
            m20: 0.0,
            m02: 0.0,
            m11: 0.0,
        };
        for i in 0..mask.height() {
            let fi = i as f64;
            for j in 0..mask.width() {
                if mask.get(j, i) != color {
                    continue;
                }
                let fj = j as f64;
                m.m00 += 1.0;
                m.m10 += fi;
                m.m01 += fj;
                m.m20 += fi * fi;
                m.m02 += fj * fj;
                m.m11 += fi * fj;
            }
        }
        if m.m00 == 0.0 {
            return Err(EmblemError::EmptyMask);
        }
        Ok(m)
    }

    /// Central moments (M20, M02, M11)
    pub fn central(&self) -> (f64, f64, f64) {
        let mu20 = self.m20 - self.m10 * self.m10 / self.m00;
        let mu02 = self.m02 - self.m01 * self.m01 / self.m00;
        let mu11 = self.m11 - self.m10 * self.m01 / self.m00;
        (mu20, mu02, mu11)
    }

    /// Invariant M1 = (M20 + M02) / m00^2
    pub fn m1(&self) -> f64 {
        let (mu20, mu02, _) = self.central();
        (mu20 + mu02) / self.m00.powi(2)
    }

    /// Invariant M7 = (M20 * M02 - M11^2) / m00^4
    pub fn m7(&self) -> f64 {
        let (mu20, mu02, mu11) = self.central();
        (mu20 * mu02 - mu11 * mu11) / self.m00.powi(4)
    }

    /// Centre of mass (x = column, y = row)
    pub fn centroid(&self) -> Point {
        Point::new((self.m01 / self.m00) as f32, (self.m10 / self.m00) as f32)
    }
}

/// W3 = perimeter / (2 * sqrt(pi * area)) - 1; 0 for an empty area
pub fn compactness(area: usize, perimeter: usize) -> f64 {
    if area == 0 {
        return 0.0;
    }
    perimeter as f64 / (2.0 * (PI * area as f64).sqrt()) - 1.0
}

/// First/last occupied column and row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extents {
    pub first_x: usize,
    pub last_x: usize,
    pub first_y: usize,
    pub last_y: usize,
}

impl Extents {
    /// `last_x - first_x`
    pub fn width(&self) -> usize {
        self.last_x - self.first_x
    }

    /// `last_y - first_y`
    pub fn height(&self) -> usize {
        self.last_y - self.first_y
    }

    /// `width / height`, `None` when the region is a single row
    pub fn aspect(&self) -> Option<f64> {
        if self.height() == 0 {
            None
        } else {
            Some(self.width() as f64 / self.height() as f64)
        }
    }

    /// Rectangle covering every occupied pixel
    pub fn to_rect(&self) -> Rect {
        Rect::from_extents(self.first_x, self.first_y, self.last_x, self.last_y)
    }
}

/// Scan rows and columns independently for `color`.
///
/// For disconnected regions the result spans from the first to the last hit
/// regardless of gaps.
pub fn extents(mask: &Image, color: u8) -> Result<Extents> {
    mask.require("extents", PixelFormat::Gray)?;
    let (w, h) = (mask.width(), mask.height());

    let row_hit = |y: usize| (0..w).any(|x| mask.get(x, y) == color);
    let col_hit = |x: usize| (0..h).any(|y| mask.get(x, y) == color);

    let first_y = (0..h).find(|&y| row_hit(y)).ok_or(EmblemError::EmptyMask)?;
    let last_y = (0..h).rev().find(|&y| row_hit(y)).ok_or(EmblemError::EmptyMask)?;
    let first_x = (0..w).find(|&x| col_hit(x)).ok_or(EmblemError::EmptyMask)?;
    let last_x = (0..w).rev().find(|&x| col_hit(x)).ok_or(EmblemError::EmptyMask)?;

    Ok(Extents {
        first_x,
        last_x,
        first_y,
        last_y,
    })
}

/// Bounding rectangle of every `color` pixel
pub fn bounding_box(mask: &Image, color: u8) -> Result<Rect> {
    Ok(extents(mask, color)?.to_rect())
}

/// Copy of `image` with everything outside `rect` zeroed
pub fn masked_copy(image: &Image, rect: &Rect) -> Image {
    let rect = rect.clamp_to(image.width(), image.height());
    let mut out = image.blank_like(image.format());
    let c = image.channels();
    let stride = image.stride();
    for y in rect.y..rect.bottom() {
        let start = y * stride + rect.x * c;
        let end = y * stride + rect.right() * c;
        out.as_bytes_mut()[start..end].copy_from_slice(&image.as_bytes()[start..end]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(width: usize, height: usize, pixels: &[(usize, usize)]) -> Image {
        let mut mask = Image::new(width, height, PixelFormat::Gray).unwrap();
        for &(x, y) in pixels {
            mask.set(x, y, 255);
        }
        mask
    }

    fn block(x0: usize, y0: usize, w: usize, h: usize) -> Vec<(usize, usize)> {
        let mut v = Vec::new();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                v.push((x, y));
            }
        }
        v
    }

    fn l_shape(x0: usize, y0: usize) -> Vec<(usize, usize)> {
        let mut v = block(x0, y0, 3, 9);
        v.extend(block(x0 + 3, y0 + 6, 6, 3));
        v
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0), "{a} vs {b}");
    }

    #[test]
    fn test_area_and_perimeter_of_square() {
        let mask = mask_from(10, 10, &block(2, 2, 4, 4));
        assert_eq!(area(&mask, 255).unwrap(), 16);
        // Every pixel of the outer ring touches background
        assert_eq!(perimeter(&mask, 255, 0).unwrap(), 12);
    }

    #[test]
    fn test_raw_moments_use_row_then_column() {
        let mask = mask_from(6, 6, &[(4, 1)]);
        assert_eq!(raw_moment(&mask, 0, 0, 255).unwrap(), 1.0);
        assert_eq!(raw_moment(&mask, 1, 0, 255).unwrap(), 1.0);
        assert_eq!(raw_moment(&mask, 0, 1, 255).unwrap(), 4.0);
        assert_eq!(raw_moment(&mask, 1, 1, 255).unwrap(), 4.0);

        let m = Moments::of(&mask, 255).unwrap();
        assert_eq!(m.centroid(), Point::new(4.0, 1.0));
    }

    #[test]
    fn test_invariants_survive_translation() {
        for shape in [block(0, 0, 5, 3), l_shape(0, 0)] {
            let moved: Vec<_> = shape.iter().map(|&(x, y)| (x + 17, y + 9)).collect();
            let a = Moments::of(&mask_from(40, 40, &shape), 255).unwrap();
            let b = Moments::of(&mask_from(40, 40, &moved), 255).unwrap();
            assert_close(a.m1(), b.m1());
            assert_close(a.m7(), b.m7());
            assert!(a.m1() > 0.0);
        }
    }

    #[test]
    fn test_empty_mask_is_an_error() {
        let mask = Image::new(5, 5, PixelFormat::Gray).unwrap();
        assert!(matches!(Moments::of(&mask, 255), Err(EmblemError::EmptyMask)));
        assert!(matches!(bounding_box(&mask, 255), Err(EmblemError::EmptyMask)));
    }

    #[test]
    fn test_compactness() {
        assert_eq!(compactness(0, 10), 0.0);
        // Disk-like ratio gives zero
        let a = 100usize;
        let p = (2.0 * (PI * a as f64).sqrt()).round() as usize;
        assert!(compactness(a, p).abs() < 0.02);
        assert!(compactness(100, 200) > 4.0);
    }

    #[test]
    fn test_extents_and_bounding_box() {
        let mask = mask_from(20, 20, &block(3, 5, 4, 2));
        let e = extents(&mask, 255).unwrap();
        assert_eq!((e.width(), e.height()), (3, 1));
        assert_eq!(e.aspect(), Some(3.0));
        assert_eq!(bounding_box(&mask, 255).unwrap(), Rect::new(3, 5, 4, 2));

        // Gaps are spanned
        let mask = mask_from(20, 20, &[(2, 2), (10, 15)]);
        assert_eq!(bounding_box(&mask, 255).unwrap(), Rect::new(2, 2, 9, 14));

        let line = mask_from(20, 20, &block(2, 2, 5, 1));
        assert_eq!(extents(&line, 255).unwrap().aspect(), None);
    }

    #[test]
    fn test_masked_copy() {
        let img = Image::filled(6, 4, PixelFormat::Color, 9).unwrap();
        let out = masked_copy(&img, &Rect::new(1, 1, 2, 2));
        assert_eq!(out.count(9), 4);
        assert_eq!(out.pixel(2, 2), &[9, 9, 9]);
        assert_eq!(out.pixel(3, 2), &[0, 0, 0]);

        // Rectangles hanging off the image are clipped
        let out = masked_copy(&img, &Rect::new(4, 2, 10, 10));
        assert_eq!(out.count(9), 4);
    }

    #[test]
    fn test_area_in_rect() {
        let mask = mask_from(10, 10, &block(0, 0, 10, 10));
        assert_eq!(area_in(&mask, &Rect::new(2, 2, 3, 4), 255).unwrap(), 12);
        assert_eq!(area_in(&mask, &Rect::new(8, 8, 5, 5), 255).unwrap(), 4);
    }
}
