//! Mutual nearest-neighbour pairing of emblem lobes

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Bounds;
use crate::detector::features::{FeatureId, ObjectFeatures};

/// Two lobes that chose each other as nearest compatible neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePairing {
    /// Lower identifier
    pub first: FeatureId,
    /// Higher identifier
    pub second: FeatureId,
}

/// Closest other candidate by centroid distance whose width ratio
/// `f.width / other.width` lies in `width_ratio`.
///
/// Candidates are visited in id order; the first of equally distant
/// neighbours wins.
pub fn nearest_compatible(
    f: &ObjectFeatures,
    candidates: &[ObjectFeatures],
    width_ratio: &Bounds,
) -> Option<FeatureId> {
    let mut best: Option<(FeatureId, f32)> = None;
    for other in candidates {
        if other.id() == f.id() || other.width() == 0 {
            continue;
        }
        let ratio = f.width() as f64 / other.width() as f64;
        if !width_ratio.contains(ratio) {
            continue;
        }
        let distance = f.centroid().distance(&other.centroid());
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((other.id(), distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Pair candidates that independently select each other.
///
/// Every identifier appears in at most one pairing and never with itself.
pub fn mutual_nearest_pairs(
    candidates: &[ObjectFeatures],
    width_ratio: &Bounds,
) -> Vec<CandidatePairing> {
    let mut ordered: Vec<&ObjectFeatures> = candidates.iter().collect();
    ordered.sort_by_key(|f| f.id());

    let choices: BTreeMap<FeatureId, FeatureId> = ordered
        .iter()
        .filter_map(|f| nearest_compatible(f, candidates, width_ratio).map(|n| (f.id(), n)))
        .collect();

    let mut paired = BTreeSet::new();
    let mut pairs = Vec::new();
    for (&a, &b) in &choices {
        if paired.contains(&a) || paired.contains(&b) {
            continue;
        }
        if choices.get(&b) == Some(&a) {
            paired.insert(a);
            paired.insert(b);
            pairs.push(CandidatePairing {
                first: a.min(b),
                second: a.max(b),
            });
        }
    }
    pairs
}
