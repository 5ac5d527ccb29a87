//! Per-region matching pipeline
//!
//! The artist owns the candidate pool and turns one source region into the tile painted
//! over it: average color, nearest candidate, color correction.

use crate::algorithm::library::CandidatePool;
use crate::algorithm::selection::{SelectionParams, find_nearest};
use crate::analysis::correction::correct;
use crate::analysis::region::average_color;
use crate::io::configuration::{CORRECTION_INTENSITY, MosaicConfig};
use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use rand::Rng;

/// Tile produced for one region
#[derive(Debug, Clone)]
pub struct PaintedTile {
    /// Corrected pixels, sized like the region
    pub pixels: RgbaImage,
    /// Pool id of the candidate the tile was made from
    pub candidate: usize,
}

/// Candidate pool bound to matching and correction settings
#[derive(Debug)]
pub struct MosaicArtist {
    pool: CandidatePool,
    selection: SelectionParams,
    correction_intensity: u8,
}

impl MosaicArtist {
    /// Create an artist with default matching and correction settings
    pub fn new(pool: CandidatePool) -> Self {
        Self {
            pool,
            selection: SelectionParams::default(),
            correction_intensity: CORRECTION_INTENSITY,
        }
    }

    /// Create an artist with the matching and correction settings of `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the selection parameters are invalid
    pub fn from_config(pool: CandidatePool, config: &MosaicConfig) -> Result<Self> {
        Self::new(pool)
            .with_selection(config.selection)
            .map(|artist| artist.with_correction_intensity(config.correction_intensity))
    }

    /// Replace the matching parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid
    pub fn with_selection(mut self, selection: SelectionParams) -> Result<Self> {
        selection.validate()?;
        self.selection = selection;
        Ok(self)
    }

    /// Replace the largest per-channel correction step
    #[must_use]
    pub fn with_correction_intensity(mut self, intensity: u8) -> Self {
        self.correction_intensity = intensity;
        self
    }

    /// Width of the tiles this artist paints
    pub const fn tile_width(&self) -> u32 {
        self.pool.tile_width()
    }

    /// Height of the tiles this artist paints
    pub const fn tile_height(&self) -> u32 {
        self.pool.tile_height()
    }

    /// Candidate pool
    pub const fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Matching parameters
    pub const fn selection(&self) -> &SelectionParams {
        &self.selection
    }

    /// Thumbnail of the candidate with the given id
    pub fn thumbnail(&self, id: usize) -> Option<&RgbaImage> {
        self.pool.get(id).map(|shape| shape.thumbnail())
    }

    /// All thumbnails in pool order
    pub fn thumbnails(&self) -> impl Iterator<Item = &RgbaImage> {
        self.pool.iter().map(|shape| shape.thumbnail())
    }

    /// Produce the tile painted over `region`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The region is larger than the tile size
    /// - The region has no pixels
    /// - Every candidate is cooling down
    pub fn tile_for_region<R: Rng>(&self, region: &RgbaImage, rng: &mut R) -> Result<PaintedTile> {
        if region.width() > self.tile_width() || region.height() > self.tile_height() {
            return Err(MosaicError::DimensionMismatch {
                requested: region.dimensions(),
                bounds: (self.tile_width(), self.tile_height()),
            });
        }

        let target = average_color(region)?;
        let shape = find_nearest(target, &self.pool, &self.selection, rng)?;
        let pixels = correct(shape.thumbnail(), region, self.correction_intensity)?;

        Ok(PaintedTile {
            pixels,
            candidate: shape.id(),
        })
    }

    /// Sweep every candidate's cooldown down by one cell
    pub fn cool_down(&self) {
        self.pool.cool_down();
    }

    /// Make every candidate available for a fresh build
    pub fn reset_cooldowns(&self) {
        self.pool.reset_cooldowns();
    }
}
