use super::Rect;

/// A validated emblem location in source-image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Expanded rectangle covering the emblem's outer ring
    pub rect: Rect,
    /// Compactness (W3) of the ring region that validated the detection
    pub ring_compactness: f64,
    /// White fill ratio measured inside the paired lobes' rectangle
    pub fill_ratio: f64,
}
