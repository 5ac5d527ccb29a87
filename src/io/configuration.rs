//! Tunable constants and runtime configuration defaults

use crate::algorithm::selection::SelectionParams;
use crate::io::error::{Result, invalid_parameter};
use std::time::Duration;

// Grid defaults
/// Tile width used when none (or an unusable one) is requested
pub const DEFAULT_TILE_WIDTH: u32 = 10;
/// Tile height used when none (or an unusable one) is requested
pub const DEFAULT_TILE_HEIGHT: u32 = 10;

// Matching
/// Capacity of the near-best shortlist (exact ties may exceed it)
pub const LIST_SIZE: usize = 20;
/// Maximum distance above the best match still considered acceptable
pub const TOLERANCE: f64 = 10.0;
/// Distances closer than this are treated as exact ties
pub const EPS: f64 = 1e-5;
/// Shortlists keep, or are refilled to, this many entries when enough candidates exist
pub const MIN_PICTURES: usize = 2;
/// Number of cells a chosen candidate stays unavailable for
pub const TILE_SPACING: u32 = 5;

// Correction
/// Largest per-channel step toward the original region
pub const CORRECTION_INTENSITY: u8 = 15;

// Execution
/// Default wait before an unfinished composite is abandoned
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// How long a timed-out composite waits for cancelled workers to stop
pub const CANCEL_SETTLE_TIME: Duration = Duration::from_millis(500);
/// Fixed seed for reproducible tie-breaking
pub const DEFAULT_SEED: u64 = 42;

// CLI requirements
/// Minimum number of candidate images the command-line tool accepts
pub const MIN_TILE_IMAGES: usize = 10;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

/// Runtime parameters for one mosaic build
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MosaicConfig {
    /// Width of a grid cell and of every candidate thumbnail
    pub tile_width: u32,
    /// Height of a grid cell and of every candidate thumbnail
    pub tile_height: u32,
    /// Number of worker threads for library building and compositing
    pub workers: usize,
    /// Wait before an unfinished composite is returned as-is
    pub timeout: Duration,
    /// Seed for the per-worker random sources
    pub seed: u64,
    /// Matching parameters
    pub selection: SelectionParams,
    /// Largest per-channel correction step
    pub correction_intensity: u8,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            workers: num_cpus::get().max(1),
            timeout: DEFAULT_TIMEOUT,
            seed: DEFAULT_SEED,
            selection: SelectionParams::default(),
            correction_intensity: CORRECTION_INTENSITY,
        }
    }
}

impl MosaicConfig {
    /// Pick tile dimensions for a source image of the given size
    ///
    /// A requested dimension is used only when it is positive and fits inside the
    /// image; otherwise the default of 10 applies.
    #[must_use]
    pub fn with_tile_size(
        mut self,
        width: Option<u32>,
        height: Option<u32>,
        image_dimensions: (u32, u32),
    ) -> Self {
        self.tile_width = resolve_tile_size(width, image_dimensions.0, DEFAULT_TILE_WIDTH);
        self.tile_height = resolve_tile_size(height, image_dimensions.1, DEFAULT_TILE_HEIGHT);
        self
    }

    /// Check that every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns an error if a tile dimension or the worker count is zero, or if the
    /// selection parameters are invalid
    pub fn validate(&self) -> Result<()> {
        if self.tile_width == 0 {
            return Err(invalid_parameter(
                "tile_width",
                &self.tile_width,
                &"must be positive",
            ));
        }
        if self.tile_height == 0 {
            return Err(invalid_parameter(
                "tile_height",
                &self.tile_height,
                &"must be positive",
            ));
        }
        if self.workers == 0 {
            return Err(invalid_parameter(
                "workers",
                &self.workers,
                &"at least one worker is required",
            ));
        }
        self.selection.validate()
    }
}

/// Resolve one requested tile dimension against the image dimension it divides
pub const fn resolve_tile_size(requested: Option<u32>, limit: u32, default: u32) -> u32 {
    match requested {
        Some(size) if size > 0 && size <= limit => size,
        _ => default,
    }
}
