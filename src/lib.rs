//! emblem_scan - two-lobed emblem detection
//!
//! Finds a symmetric, two-part badge (two diagonal blue lobes on a light
//! field inside a ring) by colour segmentation, flood-fill component
//! extraction, moment-based shape descriptors and mutual nearest-neighbour
//! pairing.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Detector configuration and thresholds
pub mod config;
/// Region extraction, shape descriptors and lobe pairing
pub mod detector;
/// Error taxonomy
pub mod error;
/// Core data structures (Image, Rect, Point, Detection)
pub mod models;
/// Detection stages
pub mod pipeline;
/// Image loading, overlays and dataset helpers for tools and benches
pub mod tools;
/// Pixel operations (saturation, colour conversion, rank filter, threshold)
pub mod utils;

pub use config::DetectorConfig;
pub use error::{EmblemError, Result};
pub use models::{ColorRange, Detection, Image, PixelFormat, Point, Rect};
pub use pipeline::PipelineTelemetry;

/// Detect emblems in a B, G, R image with the default configuration
///
/// # Arguments
/// * `image` - 3-channel image, channels stored B, G, R
///
/// # Returns
/// One [`Detection`] per validated lobe pair, or the precondition that failed
pub fn detect(image: &Image) -> Result<Vec<Detection>> {
    Detector::default().detect(image)
}

/// Detector with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectorConfig,
}

impl Detector {
    /// Create a detector with the given configuration
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Create a detector configured from `EMBLEM_*` environment variables
    pub fn from_env() -> Self {
        Self::new(DetectorConfig::from_env())
    }

    /// Active configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect emblems in an image
    pub fn detect(&self, image: &Image) -> Result<Vec<Detection>> {
        pipeline::run(image, &self.config).map(|(detections, _)| detections)
    }

    /// Detect emblems and report per-stage counters
    pub fn detect_with_telemetry(
        &self,
        image: &Image,
    ) -> Result<(Vec<Detection>, PipelineTelemetry)> {
        pipeline::run(image, &self.config)
    }
}
