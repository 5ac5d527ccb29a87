//! Spatial data structures for the output grid
//!
//! This module contains:
//! - The shared grid cursor handing out cells to workers
//! - The shared output canvas
//! - Scale-and-crop resampling of candidate images

/// Canvas shared by compositing workers
pub mod canvas;
/// Row-major grid cursor and cell geometry
pub mod cursor;
/// Scale-to-cover and center-crop resampling
pub mod resample;

pub use cursor::{Cell, GridCursor};
