//! Output canvas shared by compositing workers

use image::{RgbaImage, imageops};
use parking_lot::Mutex;

/// Output image written tile by tile from several threads
///
/// Workers paint disjoint cells, so the lock is only held for the duration of a single
/// blit and never while a tile is being matched.
#[derive(Debug)]
pub struct SharedCanvas {
    pixels: Mutex<RgbaImage>,
}

impl SharedCanvas {
    /// Start a canvas as a copy of `source`
    pub fn from_source(source: &RgbaImage) -> Self {
        Self {
            pixels: Mutex::new(source.clone()),
        }
    }

    /// Canvas dimensions (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.lock().dimensions()
    }

    /// Copy `tile` onto the canvas with its top-left corner at (`x`, `y`)
    ///
    /// Parts of the tile that fall outside the canvas are clipped.
    pub fn paint(&self, x: u32, y: u32, tile: &RgbaImage) {
        let mut pixels = self.pixels.lock();
        imageops::replace(&mut *pixels, tile, i64::from(x), i64::from(y));
    }

    /// Copy of the canvas as currently painted
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.lock().clone()
    }

    /// Take the finished canvas
    pub fn into_inner(self) -> RgbaImage {
        self.pixels.into_inner()
    }
}
