//! Per-object feature records

use std::fmt;

use crate::detector::shape::{self, Extents, Moments};
use crate::error::Result;
use crate::models::{Image, PixelFormat, Point, Rect};

/// Identifier of an [`ObjectFeatures`] record, unique within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic identifier source owned by a single pipeline run
#[derive(Debug, Clone)]
pub struct FeatureIdGen {
    next: u32,
}

impl FeatureIdGen {
    /// Start counting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next identifier
    pub fn next_id(&mut self) -> FeatureId {
        let id = FeatureId(self.next);
        self.next += 1;
        id
    }
}

impl Default for FeatureIdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Descriptors of one object mask, fixed at construction
#[derive(Debug, Clone)]
pub struct ObjectFeatures {
    id: FeatureId,
    area: usize,
    perimeter: usize,
    extents: Extents,
    compactness: f64,
    centroid: Point,
    m1: f64,
    m7: f64,
    mask: Image,
}

impl ObjectFeatures {
    /// Measure the `color` pixels of `mask` against `background`.
    ///
    /// Takes ownership of the mask so it can be reused later (merging,
    /// cropping). Fails on a non-mask image or when no pixel has `color`.
    pub fn from_mask(id: FeatureId, mask: Image, color: u8, background: u8) -> Result<Self> {
        mask.require("object_features", PixelFormat::Gray)?;

        let moments = Moments::of(&mask, color)?;
        let area = shape::area(&mask, color)?;
        let perimeter = shape::perimeter(&mask, color, background)?;
        let extents = shape::extents(&mask, color)?;

        Ok(Self {
            id,
            area,
            perimeter,
            extents,
            compactness: shape::compactness(area, perimeter),
            centroid: moments.centroid(),
            m1: moments.m1(),
            m7: moments.m7(),
            mask,
        })
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    /// Foreground pixel count
    pub fn area(&self) -> usize {
        self.area
    }

    /// Foreground pixels adjacent to background
    pub fn perimeter(&self) -> usize {
        self.perimeter
    }

    /// `last column - first column`
    pub fn width(&self) -> usize {
        self.extents.width()
    }

    /// `last row - first row`
    pub fn height(&self) -> usize {
        self.extents.height()
    }

    /// `width / height`, `None` for single-row objects
    pub fn aspect(&self) -> Option<f64> {
        self.extents.aspect()
    }

    /// Compactness W3 (0 for a disk)
    pub fn compactness(&self) -> f64 {
        self.compactness
    }

    pub fn centroid(&self) -> Point {
        self.centroid
    }

    pub fn m1(&self) -> f64 {
        self.m1
    }

    pub fn m7(&self) -> f64 {
        self.m7
    }

    /// Rectangle covering every foreground pixel
    pub fn bounds(&self) -> Rect {
        self.extents.to_rect()
    }

    /// The mask the features were measured on
    pub fn mask(&self) -> &Image {
        &self.mask
    }
}

impl fmt::Display for ObjectFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} S: {}\tL: {}\tW3: {:.4}\tM1: {:.6}\tM7: {:.8}",
            self.id, self.area, self.perimeter, self.compactness, self.m1, self.m7
        )
    }
}

/// Objects that look like one quarter of the emblem: area above 20 and an
/// aspect ratio strictly between 0.5 and 2.
pub fn quarter_candidates(features: &[ObjectFeatures]) -> Vec<&ObjectFeatures> {
    features
        .iter()
        .filter(|f| f.area() > 20 && f.aspect().is_some_and(|a| a > 0.5 && a < 2.0))
        .collect()
}
