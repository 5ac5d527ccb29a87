//! Scale-to-cover and center-crop resampling

use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Filter used when shrinking or enlarging candidate images
pub const RESAMPLE_FILTER: FilterType = FilterType::Triangle;

/// Resize `input` to exactly `width` x `height`
///
/// The image is scaled, keeping its aspect ratio, until it covers the requested size, and
/// the overhang is cropped equally from both sides.
///
/// # Errors
///
/// Returns [`MosaicError::InvalidDimensions`] if a requested dimension is zero, the input
/// is empty, or the scaled image would collapse to zero pixels on one axis
pub fn scale_and_crop(input: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(invalid_dimensions(width, height, "dimensions must be positive"));
    }
    let (source_width, source_height) = input.dimensions();
    if source_width == 0 || source_height == 0 {
        return Err(invalid_dimensions(width, height, "source image is empty"));
    }

    let (scaled_width, scaled_height) =
        cover_dimensions((source_width, source_height), (width, height));
    if scaled_width == 0 || scaled_height == 0 {
        return Err(invalid_dimensions(
            width,
            height,
            "scaled dimension would be 0",
        ));
    }

    let scaled = if (scaled_width, scaled_height) == (source_width, source_height) {
        input.clone()
    } else {
        imageops::resize(input, scaled_width, scaled_height, RESAMPLE_FILTER)
    };

    let left = (scaled_width - width) / 2;
    let top = (scaled_height - height) / 2;
    Ok(imageops::crop_imm(&scaled, left, top, width, height).to_image())
}

/// Smallest aspect-preserving size that covers `target`
///
/// Scales along whichever axis needs the larger factor; the other axis is truncated,
/// which still leaves it at least as large as the target.
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (source_width, source_height) = (u64::from(source.0), u64::from(source.1));
    let (width, height) = (u64::from(target.0), u64::from(target.1));

    // width / source_width > height / source_height, cross-multiplied
    if width * source_height > height * source_width {
        let scaled_height = source_height * width / source_width;
        (target.0, scaled_height.min(u64::from(u32::MAX)) as u32)
    } else {
        let scaled_width = source_width * height / source_height;
        (scaled_width.min(u64::from(u32::MAX)) as u32, target.1)
    }
}

fn invalid_dimensions(width: u32, height: u32, reason: &str) -> MosaicError {
    MosaicError::InvalidDimensions {
        width,
        height,
        reason: reason.to_string(),
    }
}
