//! Average color of an image region
//!
//! The accumulation loop walks columns and, inside each column, a range of rows chosen by a
//! [`RegionColorPolicy`]. Rectangular tiles cover the whole buffer; other tile shapes only
//! need a new policy.

use crate::io::error::{MosaicError, Result};
use image::{GenericImageView, Rgba};

/// Decides which pixels of a buffer belong to a region
///
/// Bounds are expressed against the buffer dimensions `(width, height)`, so one policy
/// value can be reused for every region it is applied to.
pub trait RegionColorPolicy {
    /// First column of the region
    fn column_start(&self, dimensions: (u32, u32)) -> u32;

    /// Column after the last column of the region
    fn column_end_exclusive(&self, dimensions: (u32, u32)) -> u32;

    /// First row of column `x`
    fn row_start(&self, dimensions: (u32, u32), x: u32) -> u32;

    /// Row after the last row of column `x`
    fn row_end_exclusive(&self, dimensions: (u32, u32), x: u32) -> u32;

    /// Buffer row that the iteration row `y` reads from
    fn map_row(&self, dimensions: (u32, u32), y: u32) -> u32;
}

/// Every pixel of the buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct Rectangle;

impl RegionColorPolicy for Rectangle {
    fn column_start(&self, _dimensions: (u32, u32)) -> u32 {
        0
    }

    fn column_end_exclusive(&self, dimensions: (u32, u32)) -> u32 {
        dimensions.0
    }

    fn row_start(&self, _dimensions: (u32, u32), _x: u32) -> u32 {
        0
    }

    fn row_end_exclusive(&self, dimensions: (u32, u32), _x: u32) -> u32 {
        dimensions.1
    }

    fn map_row(&self, _dimensions: (u32, u32), y: u32) -> u32 {
        y
    }
}

/// Mean color of every pixel in a rectangular region
///
/// # Errors
///
/// Returns [`MosaicError::InvalidRegion`] if the region has no pixels
pub fn average_color<I>(region: &I) -> Result<Rgba<u8>>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    average_color_with(region, &Rectangle)
}

/// Mean color of the pixels a policy selects
///
/// Channel sums are kept in `u64`; the mean is truncated toward zero. Coordinates a
/// policy reports outside the buffer are skipped.
///
/// # Errors
///
/// Returns [`MosaicError::InvalidRegion`] if the policy selects no pixels
pub fn average_color_with<I, P>(region: &I, policy: &P) -> Result<Rgba<u8>>
where
    I: GenericImageView<Pixel = Rgba<u8>>,
    P: RegionColorPolicy + ?Sized,
{
    let dimensions = region.dimensions();
    let mut sums = [0u64; 4];
    let mut count = 0u64;

    for x in policy.column_start(dimensions)..policy.column_end_exclusive(dimensions) {
        for y in policy.row_start(dimensions, x)..policy.row_end_exclusive(dimensions, x) {
            let row = policy.map_row(dimensions, y);
            if !region.in_bounds(x, row) {
                continue;
            }
            let pixel = region.get_pixel(x, row);
            for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += u64::from(channel);
            }
            count += 1;
        }
    }

    if count == 0 {
        return Err(MosaicError::InvalidRegion {
            width: dimensions.0,
            height: dimensions.1,
            cell: None,
        });
    }

    Ok(Rgba(sums.map(|sum| (sum / count) as u8)))
}
