//! Color analysis of image regions

/// Bounded per-channel blending of a candidate toward the region it replaces
pub mod correction;
/// Average color of a region under a pluggable shape policy
pub mod region;
