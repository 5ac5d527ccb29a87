//! Color correction of a chosen candidate toward the region it replaces

use crate::io::error::{MosaicError, Result};
use crate::math::color::step_toward;
use image::{Rgba, RgbaImage};

/// Blend a candidate thumbnail toward the original region
///
/// The output has the dimensions of `original`, which must fit inside `candidate`; only the
/// overlapping top-left part of the candidate is used. Each channel of each pixel moves
/// toward the original by at most `intensity`, so the candidate keeps its texture while
/// taking on the tone of the region.
///
/// # Errors
///
/// Returns [`MosaicError::DimensionMismatch`] if `original` is wider or taller than
/// `candidate`
pub fn correct(candidate: &RgbaImage, original: &RgbaImage, intensity: u8) -> Result<RgbaImage> {
    let (width, height) = original.dimensions();
    if width > candidate.width() || height > candidate.height() {
        return Err(MosaicError::DimensionMismatch {
            requested: (width, height),
            bounds: candidate.dimensions(),
        });
    }

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        correct_pixel(*candidate.get_pixel(x, y), *original.get_pixel(x, y), intensity)
    }))
}

/// Step every channel of `candidate` toward `original`
pub fn correct_pixel(candidate: Rgba<u8>, original: Rgba<u8>, intensity: u8) -> Rgba<u8> {
    let mut corrected = candidate;
    for (channel, &target) in corrected.0.iter_mut().zip(original.0.iter()) {
        *channel = step_toward(*channel, target, intensity);
    }
    corrected
}
