//! A single candidate tile and its cooldown counter

use crate::analysis::region::average_color;
use crate::io::error::Result;
use crate::spatial::resample::scale_and_crop;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

/// Pool entry: a fixed-size thumbnail with its cached average color
///
/// The thumbnail and average never change after construction. The cooldown is the only
/// mutable state and sits behind a lock of its own, so workers touching different shapes
/// never contend.
#[derive(Debug)]
pub struct CandidateShape {
    id: usize,
    thumbnail: RgbaImage,
    average: Rgba<u8>,
    cooldown: Mutex<u32>,
}

impl CandidateShape {
    /// Wrap an already tile-sized thumbnail
    ///
    /// # Errors
    ///
    /// Returns an error if the thumbnail has no pixels
    pub fn new(id: usize, thumbnail: RgbaImage) -> Result<Self> {
        let average = average_color(&thumbnail)?;
        Ok(Self {
            id,
            thumbnail,
            average,
            cooldown: Mutex::new(0),
        })
    }

    /// Resample a source image to the tile size and wrap it
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be resampled to `width` x `height`
    pub fn from_source(id: usize, source: &RgbaImage, width: u32, height: u32) -> Result<Self> {
        Self::new(id, scale_and_crop(source, width, height)?)
    }

    /// Position of the shape in its pool
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Tile-sized image painted for this shape
    pub const fn thumbnail(&self) -> &RgbaImage {
        &self.thumbnail
    }

    /// Average color computed at construction
    pub const fn average_color(&self) -> Rgba<u8> {
        self.average
    }

    /// Thumbnail dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.thumbnail.dimensions()
    }

    /// Remaining cells before the shape can be chosen again
    pub fn cooldown(&self) -> u32 {
        *self.cooldown.lock()
    }

    /// Whether the shape can currently be chosen
    pub fn is_available(&self) -> bool {
        self.cooldown() == 0
    }

    /// Arm the cooldown if the shape is still available
    ///
    /// Returns `false` when another worker armed it first.
    pub fn try_arm(&self, spacing: u32) -> bool {
        let mut cooldown = self.cooldown.lock();
        if *cooldown > 0 {
            return false;
        }
        *cooldown = spacing;
        true
    }

    /// Count the cooldown down by one, stopping at zero
    pub fn decrease_cooldown(&self) {
        let mut cooldown = self.cooldown.lock();
        *cooldown = cooldown.saturating_sub(1);
    }

    /// Make the shape available again
    pub fn reset_cooldown(&self) {
        *self.cooldown.lock() = 0;
    }
}
