//! Mathematical utilities for color comparison

/// Euclidean ARGB distance and channel stepping
pub mod color;
