//! Tests for the per-region matching pipeline

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tessera::algorithm::selection::SelectionParams;
    use tessera::{CandidatePool, MosaicArtist, MosaicConfig, MosaicError};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn artist() -> MosaicArtist {
        let pool = CandidatePool::from_thumbnails(vec![
            RgbaImage::from_pixel(10, 10, RED),
            RgbaImage::from_pixel(10, 10, BLUE),
        ])
        .unwrap();
        MosaicArtist::new(pool)
    }

    // Tests a region is painted with its nearest candidate
    // Verified by picking the farthest candidate
    #[test]
    fn test_nearest_candidate_chosen() {
        let artist = artist();
        let mut rng = StdRng::seed_from_u64(0);
        let region = RgbaImage::from_pixel(10, 10, Rgba([250, 5, 5, 255]));

        let tile = artist.tile_for_region(&region, &mut rng).unwrap();
        assert_eq!(tile.candidate, 0);
        assert_eq!(tile.pixels.dimensions(), (10, 10));
    }

    // Tests the painted tile is corrected toward the region
    // Verified by painting the raw thumbnail
    #[test]
    fn test_tile_is_corrected() {
        let artist = artist();
        let mut rng = StdRng::seed_from_u64(0);
        let region = RgbaImage::from_pixel(10, 10, Rgba([200, 0, 0, 255]));

        let tile = artist.tile_for_region(&region, &mut rng).unwrap();
        assert!(tile.pixels.pixels().all(|pixel| *pixel == Rgba([240, 0, 0, 255])));
    }

    // Tests edge regions produce tiles of the region size
    // Verified by returning full tiles for edge cells
    #[test]
    fn test_edge_region() {
        let artist = artist();
        let mut rng = StdRng::seed_from_u64(0);
        let region = RgbaImage::from_pixel(4, 7, BLUE);

        let tile = artist.tile_for_region(&region, &mut rng).unwrap();
        assert_eq!(tile.candidate, 1);
        assert_eq!(tile.pixels.dimensions(), (4, 7));
    }

    // Tests regions larger than the tile are rejected
    // Verified by cropping oversized regions silently
    #[test]
    fn test_oversized_region_rejected() {
        let artist = artist();
        let mut rng = StdRng::seed_from_u64(0);
        let region = RgbaImage::new(11, 10);
        assert!(matches!(
            artist.tile_for_region(&region, &mut rng),
            Err(MosaicError::DimensionMismatch { .. })
        ));
    }

    // Tests the chosen candidate cools down and returns after the sweeps
    // Verified by sweeping without decrementing cooldowns
    #[test]
    fn test_cooldown_cycle() {
        let artist = artist();
        let mut rng = StdRng::seed_from_u64(0);
        let region = RgbaImage::from_pixel(10, 10, RED);
        let spacing = artist.selection().tile_spacing;

        artist.tile_for_region(&region, &mut rng).unwrap();
        assert_eq!(artist.pool().available_count(), 1);

        for _ in 0..spacing {
            artist.cool_down();
        }
        assert_eq!(artist.pool().available_count(), 2);

        artist.tile_for_region(&region, &mut rng).unwrap();
        artist.reset_cooldowns();
        assert_eq!(artist.pool().available_count(), 2);
    }

    // Tests configuration is applied and validated
    // Verified by ignoring the configured intensity
    #[test]
    fn test_from_config() {
        let pool = CandidatePool::from_thumbnails(vec![RgbaImage::from_pixel(2, 2, RED)]).unwrap();
        let config = MosaicConfig {
            correction_intensity: 255,
            ..MosaicConfig::default()
        };
        let artist = MosaicArtist::from_config(pool, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let region = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let tile = artist.tile_for_region(&region, &mut rng).unwrap();
        assert_eq!(tile.pixels, region);
    }

    // Tests invalid selection parameters are refused
    // Verified by skipping validation when replacing parameters
    #[test]
    fn test_invalid_selection_refused() {
        let params = SelectionParams {
            list_size: 0,
            ..SelectionParams::default()
        };
        assert!(artist().with_selection(params).is_err());
    }

    // Tests thumbnails are exposed by id and in pool order
    // Verified by returning thumbnails in reverse order
    #[test]
    fn test_thumbnails() {
        let artist = artist();
        assert_eq!(artist.thumbnail(1).map(|image| *image.get_pixel(0, 0)), Some(BLUE));
        assert!(artist.thumbnail(2).is_none());
        assert_eq!(artist.thumbnails().count(), 2);
        assert_eq!((artist.tile_width(), artist.tile_height()), (10, 10));
    }
}
