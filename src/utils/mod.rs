//! Pixel-level image processing
//!
//! This module provides the building blocks of emblem detection:
//! - Saturating contrast/brightness adjustment
//! - Colour space conversion (grayscale, HSV)
//! - Rank (order-statistic) filtering
//! - Range thresholding into binary masks

pub mod grayscale;
pub mod hsv;
pub mod pixel_ops;
pub mod rank_filter;
pub mod threshold;
