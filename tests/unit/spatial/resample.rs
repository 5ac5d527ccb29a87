//! Tests for scale-to-cover resampling

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tessera::MosaicError;
    use tessera::spatial::resample::{cover_dimensions, scale_and_crop};

    // Tests a wide image is scaled by height and cropped horizontally
    // Verified by scaling along the smaller factor
    #[test]
    fn test_cover_wide_source() {
        assert_eq!(cover_dimensions((200, 100), (10, 10)), (20, 10));
    }

    // Tests a tall image is scaled by width and cropped vertically
    // Verified by swapping the comparison
    #[test]
    fn test_cover_tall_source() {
        assert_eq!(cover_dimensions((100, 300), (10, 10)), (10, 30));
    }

    // Tests the result always has exactly the requested size
    // Verified by returning the scaled image without cropping
    #[test]
    fn test_exact_output_size() {
        for (width, height) in [(37, 11), (5, 80), (10, 10), (1, 1)] {
            let source = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
            let thumbnail = scale_and_crop(&source, 10, 7).unwrap();
            assert_eq!(thumbnail.dimensions(), (10, 7));
        }
    }

    // Tests cropping keeps the center of the image
    // Verified by cropping from the left edge
    #[test]
    fn test_crop_is_centered() {
        let source = RgbaImage::from_fn(30, 10, |x, _| {
            if (10..20).contains(&x) {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let thumbnail = scale_and_crop(&source, 10, 10).unwrap();
        assert!(thumbnail.pixels().all(|pixel| *pixel == Rgba([255, 255, 255, 255])));
    }

    // Tests uniform colors survive resampling
    // Verified by using a filter that darkens edges
    #[test]
    fn test_uniform_color_preserved() {
        let source = RgbaImage::from_pixel(64, 48, Rgba([120, 60, 30, 255]));
        let thumbnail = scale_and_crop(&source, 10, 10).unwrap();
        assert!(thumbnail.pixels().all(|pixel| *pixel == Rgba([120, 60, 30, 255])));
    }

    // Tests zero target dimensions are rejected
    // Verified by removing the positive-size check
    #[test]
    fn test_zero_target_rejected() {
        let source = RgbaImage::new(10, 10);
        assert!(matches!(
            scale_and_crop(&source, 0, 10),
            Err(MosaicError::InvalidDimensions { .. })
        ));
    }

    // Tests empty sources are rejected
    // Verified by dividing by the empty source width
    #[test]
    fn test_empty_source_rejected() {
        assert!(matches!(
            scale_and_crop(&RgbaImage::new(0, 0), 10, 10),
            Err(MosaicError::InvalidDimensions { .. })
        ));
    }
}
