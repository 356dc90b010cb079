//! Region analysis: connected components, shape descriptors and pairing
//!
//! - Flood-fill labelling and mask set operations
//! - Area, perimeter, moments, compactness and bounding boxes
//! - Per-object feature records
//! - Mutual nearest-neighbour pairing of lobes

pub mod features;
pub mod pairing;
pub mod region;
pub mod shape;
