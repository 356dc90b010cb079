//! Error types for emblem detection

use crate::models::PixelFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for emblem_scan operations
pub type Result<T> = std::result::Result<T, EmblemError>;

/// Why a flood fill could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRefusal {
    /// Target and replacement labels are equal
    SameColor,
    /// The seed pixel does not carry the target label
    SeedNotTarget,
    /// The seed lies outside the mask
    SeedOutOfBounds,
}

impl std::fmt::Display for FillRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FillRefusal::SameColor => "target color equals replacement color",
            FillRefusal::SeedNotTarget => "seed pixel is not the target color",
            FillRefusal::SeedOutOfBounds => "seed lies outside the mask",
        };
        f.write_str(text)
    }
}

/// Precondition violations and I/O failures.
///
/// Heuristic rejection of a candidate is never an error; the pipeline simply
/// drops it.
#[derive(Error, Debug)]
pub enum EmblemError {
    /// Only 1- and 3-channel images are supported
    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),

    /// Operation received the wrong pixel format
    #[error("{operation} expects a {expected:?} image, got {actual:?}")]
    FormatMismatch {
        operation: &'static str,
        expected: PixelFormat,
        actual: PixelFormat,
    },

    /// Zero-sized grids are rejected
    #[error("image must be non-empty, got {width}x{height}")]
    EmptyImage { width: usize, height: usize },

    /// Raw buffer does not match the declared geometry
    #[error("buffer holds {actual} bytes, expected {expected} for {width}x{height}x{channels}")]
    BufferSize {
        width: usize,
        height: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },

    /// Two operands must share dimensions
    #[error("dimension mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },

    /// Rank filter kernels must be odd and at least 1
    #[error("invalid kernel size {0}: must be odd and >= 1")]
    InvalidKernel(usize),

    /// Rank index must address a neighbourhood slot
    #[error("rank index {index} out of range for kernel {kernel} ({} slots)", .kernel * .kernel)]
    RankOutOfRange { index: usize, kernel: usize },

    /// Flood fill preconditions failed; the mask was not touched
    #[error("flood fill not applicable: {0}")]
    FillNotApplicable(FillRefusal),

    /// Moments of an empty mask are undefined
    #[error("shape descriptors are undefined for an empty mask")]
    EmptyMask,

    /// Image file could not be loaded or decoded
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image file could not be written
    #[error("failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl EmblemError {
    /// Build a format mismatch for `operation`
    pub fn format(operation: &'static str, expected: PixelFormat, actual: PixelFormat) -> Self {
        EmblemError::FormatMismatch {
            operation,
            expected,
            actual,
        }
    }

    /// True for malformed-input errors that abort only the current image
    pub fn is_precondition(&self) -> bool {
        !matches!(
            self,
            EmblemError::ImageLoad { .. } | EmblemError::ImageSave { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = EmblemError::RankOutOfRange { index: 9, kernel: 3 };
        assert_eq!(
            err.to_string(),
            "rank index 9 out of range for kernel 3 (9 slots)"
        );

        let err = EmblemError::FillNotApplicable(FillRefusal::SameColor);
        assert!(err.to_string().contains("equals replacement"));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_format_mismatch_display() {
        let err = EmblemError::format("to_hsv", PixelFormat::Color, PixelFormat::Gray);
        assert_eq!(err.to_string(), "to_hsv expects a Color image, got Gray");
    }
}
