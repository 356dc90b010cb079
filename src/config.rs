//! Detector configuration
//!
//! [`DetectorConfig::default`] carries the reference thresholds. A handful of
//! them can be overridden from `EMBLEM_*` environment variables through
//! [`DetectorConfig::from_env`].

use crate::error::Result;
use crate::models::ColorRange;
use crate::utils::rank_filter::validate_rank_args;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Numeric interval, closed or open at both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower end
    pub min: f64,
    /// Upper end
    pub max: f64,
    /// Whether the ends themselves belong to the interval
    pub inclusive: bool,
}

impl Bounds {
    /// `[min, max]`
    pub const fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            inclusive: true,
        }
    }

    /// `(min, max)`
    pub const fn open(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            inclusive: false,
        }
    }

    /// Membership test; NaN is never contained
    pub fn contains(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.min && value <= self.max
        } else {
            value > self.min && value < self.max
        }
    }
}

/// HSV range of the emblem's blue lobes
pub const BLUE_RANGE: ColorRange = ColorRange::new([95, 100, 0], [107, 255, 150]);
/// HSV range of the region between the lobes
pub const WHITE_RANGE: ColorRange = ColorRange::new([0, 0, 0], [180, 50, 120]);
/// HSV range of the outer ring
pub const BLACK_RANGE: ColorRange = ColorRange::new([0, 0, 150], [180, 255, 255]);

/// All tunables of the detection pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Lobe colour in HSV
    pub blue: ColorRange,
    /// Inner field colour in HSV
    pub white: ColorRange,
    /// Outer ring colour in HSV
    pub black: ColorRange,
    /// Rank filter window size (odd)
    pub denoise_kernel: usize,
    /// Rank selected by the denoise filter (4 = median of 3x3)
    pub denoise_rank: usize,
    /// Components must have a fill area strictly above this
    pub min_component_area: usize,
    /// Accepted lobe aspect ratios
    pub candidate_aspect: Bounds,
    /// Lobes must be strictly larger than this
    pub min_candidate_area: usize,
    /// Search window half-size in multiples of the lobe width/height
    pub window_scale: i64,
    /// Accepted width ratio between paired lobes
    pub pair_width_ratio: Bounds,
    /// Accepted white fill of the paired lobes' rectangle
    pub white_fill: Bounds,
    /// Ring rectangle size relative to the lobes' rectangle
    pub ring_expansion: f64,
    /// Ring rectangle shift, as a fraction of its size split over both sides
    pub ring_offset: f64,
    /// Ring regions less compact than this are rejected
    pub max_ring_compactness: f64,
    /// Accepted aspect ratio of the ring rectangle
    pub ring_aspect: Bounds,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            blue: BLUE_RANGE,
            white: WHITE_RANGE,
            black: BLACK_RANGE,
            denoise_kernel: 3,
            denoise_rank: 4,
            min_component_area: 20,
            candidate_aspect: Bounds::closed(0.4, 1.6),
            min_candidate_area: 5,
            window_scale: 2,
            pair_width_ratio: Bounds::closed(0.6, 1.4),
            white_fill: Bounds::open(0.15, 0.55),
            ring_expansion: 1.6,
            ring_offset: 0.3,
            max_ring_compactness: 4.0,
            ring_aspect: Bounds::open(0.8, 1.2),
        }
    }
}

impl DetectorConfig {
    /// Defaults with overrides from `EMBLEM_DENOISE_KERNEL`,
    /// `EMBLEM_DENOISE_RANK`, `EMBLEM_MIN_COMPONENT_AREA` and
    /// `EMBLEM_MAX_RING_COMPACTNESS`.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            denoise_kernel: parse_env_usize("EMBLEM_DENOISE_KERNEL", base.denoise_kernel),
            denoise_rank: parse_env_usize("EMBLEM_DENOISE_RANK", base.denoise_rank),
            min_component_area: parse_env_usize(
                "EMBLEM_MIN_COMPONENT_AREA",
                base.min_component_area,
            ),
            max_ring_compactness: parse_env_f64(
                "EMBLEM_MAX_RING_COMPACTNESS",
                base.max_ring_compactness,
            ),
            ..base
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        validate_rank_args(self.denoise_kernel, self.denoise_rank)
    }
}
