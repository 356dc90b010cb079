//! Emblem detection stages
//!
//! denoise -> HSV -> masks -> lobe extraction -> filtering -> pairing ->
//! white fill check -> ring check. Each call owns its masks and identifier
//! counter; nothing is shared between images.

use log::{debug, trace};

use crate::config::DetectorConfig;
use crate::detector::features::{FeatureIdGen, ObjectFeatures, quarter_candidates};
use crate::detector::pairing::{CandidatePairing, mutual_nearest_pairs};
use crate::detector::region::{bitwise_or, extract_objects};
use crate::detector::shape::{area_in, bounding_box, masked_copy};
use crate::error::Result;
use crate::models::{Detection, Image, PixelFormat, Rect};
use crate::utils::hsv::to_hsv;
use crate::utils::rank_filter::rank_filter;
use crate::utils::threshold::{BACKGROUND, FOREGROUND, in_range};

/// Stage-level counters for one image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineTelemetry {
    /// Blue components above the minimum area
    pub components: usize,
    /// Components that look like a single quarter
    pub quarter_candidates: usize,
    /// Components surviving the window filter
    pub candidates: usize,
    /// Mutual nearest-neighbour pairs
    pub pairs: usize,
    /// Pairs whose white fill was in range
    pub fill_accepted: usize,
    /// Pairs dropped because the ring was too irregular
    pub ring_rejected: usize,
    /// Emitted detections
    pub detections: usize,
}

/// Binary masks of the three emblem colours
#[derive(Debug, Clone)]
pub struct ColorMasks {
    /// Lobe pixels
    pub blue: Image,
    /// Inner field pixels
    pub white: Image,
    /// Ring pixels
    pub black: Image,
}

/// Denoise `source` and threshold it into the three colour masks
pub fn segment(source: &Image, config: &DetectorConfig) -> Result<ColorMasks> {
    source.require("segment", PixelFormat::Color)?;
    let denoised = rank_filter(source, config.denoise_kernel, config.denoise_rank)?;
    let hsv = to_hsv(&denoised)?;
    Ok(ColorMasks {
        blue: in_range(&hsv, &config.blue)?,
        white: in_range(&hsv, &config.white)?,
        black: in_range(&hsv, &config.black)?,
    })
}

/// Measure every `FOREGROUND` component of `mask` above the minimum area
pub fn extract_features(
    mask: &Image,
    config: &DetectorConfig,
    ids: &mut FeatureIdGen,
) -> Result<Vec<ObjectFeatures>> {
    extract_objects(mask, FOREGROUND, BACKGROUND, config.min_component_area)?
        .into_iter()
        .map(|object| ObjectFeatures::from_mask(ids.next_id(), object, FOREGROUND, BACKGROUND))
        .collect()
}

/// Window of `window_scale` times the object's width/height around its
/// centroid, clamped to the image. The last row/column is exclusive.
pub fn search_window(f: &ObjectFeatures, width: usize, height: usize, scale: i64) -> Rect {
    let (cx, cy) = f.centroid().to_pixel();
    let dx = scale * f.width() as i64;
    let dy = scale * f.height() as i64;
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    let first_x = (cx - dx).clamp(0, max_x) as usize;
    let last_x = (cx + dx).clamp(0, max_x) as usize;
    let first_y = (cy - dy).clamp(0, max_y) as usize;
    let last_y = (cy + dy).clamp(0, max_y) as usize;

    Rect::new(first_x, first_y, last_x - first_x, last_y - first_y)
}

/// Keep lobes with a plausible shape, enough white and ring colour around
/// them, and at least one other lobe nearby.
pub fn filter_candidates(
    features: Vec<ObjectFeatures>,
    white: &Image,
    black: &Image,
    config: &DetectorConfig,
) -> Result<Vec<ObjectFeatures>> {
    white.require_same_size(black)?;

    let mut keep = Vec::with_capacity(features.len());
    for f in &features {
        let window = search_window(f, white.width(), white.height(), config.window_scale);

        let shape_ok = f
            .aspect()
            .is_some_and(|a| config.candidate_aspect.contains(a));
        let white_area = area_in(white, &window, FOREGROUND)?;
        let black_area = area_in(black, &window, FOREGROUND)?;
        let area_ok = f.area() < white_area
            && f.area() < black_area
            && f.area() > config.min_candidate_area;
        let has_neighbor = features
            .iter()
            .any(|other| other.id() != f.id() && window.contains_point(&other.centroid()));

        let passed = shape_ok && area_ok && has_neighbor;
        if !passed {
            trace!(
                "candidate {} dropped: shape={} area={} (white {}, black {}) neighbor={}",
                f.id(),
                shape_ok,
                area_ok,
                white_area,
                black_area,
                has_neighbor
            );
        }
        keep.push(passed);
    }

    Ok(features
        .into_iter()
        .zip(keep)
        .filter_map(|(f, k)| k.then_some(f))
        .collect())
}

/// Ring rectangle: the lobes' rectangle grown by `expansion`, shifted by
/// `offset / 2` of the new size and clamped to the image.
pub fn ring_rect(lobes: &Rect, width: usize, height: usize, expansion: f64, offset: f64) -> Rect {
    let new_width = (expansion * lobes.width as f64) as usize;
    let new_height = (expansion * lobes.height as f64) as usize;
    let x = (lobes.x as f64 - new_width as f64 * offset / 2.0).max(0.0) as usize;
    let y = (lobes.y as f64 - new_height as f64 * offset / 2.0).max(0.0) as usize;
    Rect::new(x.min(width), y.min(height), new_width, new_height).clamp_to(width, height)
}

/// Run the white fill and ring checks on one pair
fn validate_pair(
    first: &ObjectFeatures,
    second: &ObjectFeatures,
    masks: &ColorMasks,
    config: &DetectorConfig,
    ids: &mut FeatureIdGen,
    telemetry: &mut PipelineTelemetry,
) -> Result<Option<Detection>> {
    let merged = bitwise_or(first.mask(), second.mask())?;
    let lobes = bounding_box(&merged, FOREGROUND)?;

    let cut_white = masked_copy(&masks.white, &lobes);
    if cut_white.count(FOREGROUND) == 0 {
        trace!("pair {}/{} has no white inside {:?}", first.id(), second.id(), lobes);
        return Ok(None);
    }
    let white = ObjectFeatures::from_mask(ids.next_id(), cut_white, FOREGROUND, BACKGROUND)?;
    let fill_ratio = white.area() as f64 / lobes.area() as f64;
    if !config.white_fill.contains(fill_ratio) {
        trace!("pair {}/{} white fill {:.3} out of range", first.id(), second.id(), fill_ratio);
        return Ok(None);
    }
    telemetry.fill_accepted += 1;

    let ring = ring_rect(
        &lobes,
        masks.black.width(),
        masks.black.height(),
        config.ring_expansion,
        config.ring_offset,
    );
    let cut_black = masked_copy(&masks.black, &ring);
    if cut_black.count(FOREGROUND) == 0 {
        trace!("pair {}/{} has no ring inside {:?}", first.id(), second.id(), ring);
        return Ok(None);
    }
    let black = ObjectFeatures::from_mask(ids.next_id(), cut_black, FOREGROUND, BACKGROUND)?;
    if black.compactness() > config.max_ring_compactness {
        trace!("pair {}/{} ring too irregular: {}", first.id(), second.id(), black);
        telemetry.ring_rejected += 1;
        return Ok(None);
    }

    let centered = ring.contains_point(&black.centroid());
    let square = ring.aspect().is_some_and(|a| config.ring_aspect.contains(a));
    if !(centered && square) {
        trace!(
            "pair {}/{} ring rejected: centered={} square={}",
            first.id(),
            second.id(),
            centered,
            square
        );
        return Ok(None);
    }

    Ok(Some(Detection {
        rect: ring,
        ring_compactness: black.compactness(),
        fill_ratio,
    }))
}

/// Run every stage on one colour image
pub fn run(source: &Image, config: &DetectorConfig) -> Result<(Vec<Detection>, PipelineTelemetry)> {
    config.validate()?;
    let mut telemetry = PipelineTelemetry::default();
    let mut ids = FeatureIdGen::new();

    let masks = segment(source, config)?;

    let features = extract_features(&masks.blue, config, &mut ids)?;
    telemetry.components = features.len();
    telemetry.quarter_candidates = quarter_candidates(&features).len();

    let candidates = filter_candidates(features, &masks.white, &masks.black, config)?;
    telemetry.candidates = candidates.len();

    let pairs = mutual_nearest_pairs(&candidates, &config.pair_width_ratio);
    telemetry.pairs = pairs.len();
    debug!(
        "{} components, {} quarter-like, {} candidates, {} pairs",
        telemetry.components, telemetry.quarter_candidates, telemetry.candidates, telemetry.pairs
    );

    let mut detections = Vec::new();
    for CandidatePairing { first, second } in pairs {
        let (Some(a), Some(b)) = (
            candidates.iter().find(|f| f.id() == first),
            candidates.iter().find(|f| f.id() == second),
        ) else {
            continue;
        };
        if let Some(detection) = validate_pair(a, b, &masks, config, &mut ids, &mut telemetry)? {
            debug!("emblem found at {:?}", detection.rect);
            detections.push(detection);
        }
    }

    telemetry.detections = detections.len();
    Ok((detections, telemetry))
}
