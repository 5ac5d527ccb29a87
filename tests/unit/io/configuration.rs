//! Tests for configuration defaults, tile size resolution and validation

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tessera::MosaicConfig;
    use tessera::io::configuration::{
        CORRECTION_INTENSITY, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, DEFAULT_TIMEOUT,
        MIN_PICTURES, TILE_SPACING, TOLERANCE, resolve_tile_size,
    };

    // Tests defaults carry the documented constants
    // Verified by changing the default tolerance
    #[test]
    fn test_defaults() {
        let config = MosaicConfig::default();
        assert_eq!((config.tile_width, config.tile_height), (10, 10));
        assert!(config.workers >= 1);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.correction_intensity, CORRECTION_INTENSITY);
        assert!((config.selection.tolerance - TOLERANCE).abs() < f64::EPSILON);
        assert_eq!(config.selection.min_pictures, MIN_PICTURES);
        assert_eq!(config.selection.tile_spacing, TILE_SPACING);
        assert!(config.validate().is_ok());
    }

    // Tests requested sizes inside the image are used as-is
    // Verified by always returning the default
    #[test]
    fn test_requested_size_used() {
        assert_eq!(resolve_tile_size(Some(16), 100, DEFAULT_TILE_WIDTH), 16);
        assert_eq!(resolve_tile_size(Some(100), 100, DEFAULT_TILE_WIDTH), 100);
    }

    // Tests unusable sizes fall back to the default
    // Verified by accepting sizes larger than the image
    #[test]
    fn test_unusable_size_falls_back() {
        assert_eq!(resolve_tile_size(None, 100, DEFAULT_TILE_WIDTH), 10);
        assert_eq!(resolve_tile_size(Some(0), 100, DEFAULT_TILE_WIDTH), 10);
        assert_eq!(resolve_tile_size(Some(101), 100, DEFAULT_TILE_HEIGHT), 10);
    }

    // Tests width and height are resolved against their own axis
    // Verified by resolving height against the image width
    #[test]
    fn test_with_tile_size_per_axis() {
        let config = MosaicConfig::default().with_tile_size(Some(30), Some(30), (40, 20));
        assert_eq!((config.tile_width, config.tile_height), (30, 10));
    }

    // Tests zero tile dimensions are rejected
    // Verified by skipping the tile width check
    #[test]
    fn test_zero_tile_rejected() {
        let config = MosaicConfig {
            tile_width: 0,
            ..MosaicConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // Tests a zero worker count is rejected
    // Verified by clamping workers to one silently
    #[test]
    fn test_zero_workers_rejected() {
        let config = MosaicConfig {
            workers: 0,
            timeout: Duration::from_secs(1),
            ..MosaicConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // Tests invalid selection parameters fail configuration validation
    // Verified by not validating the nested selection parameters
    #[test]
    fn test_invalid_selection_rejected() {
        let mut config = MosaicConfig::default();
        config.selection.tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }
}
