//! Tests for image loading, saving and thumbnail export

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;
    use tessera::MosaicError;
    use tessera::io::image::{
        export_thumbnails, image_paths, load_directory, load_image, save_image,
    };

    // Tests an image survives a save and load through PNG
    // Verified by saving with RGB color type
    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tile.png");
        let image = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 128]));

        save_image(&image, &path).unwrap();
        assert_eq!(load_image(&path).unwrap(), image);
    }

    // Tests missing parent directories are created on save
    // Verified by skipping directory creation
    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.png");
        save_image(&RgbaImage::new(1, 1), &path).unwrap();
        assert!(path.exists());
    }

    // Tests a missing file reports its path
    // Verified by dropping the path from the error
    #[test]
    fn test_load_missing_file() {
        let result = load_image("/nonexistent/tessera/input.png");
        match result {
            Err(MosaicError::ImageLoad { path, .. }) => {
                assert!(path.ends_with("input.png"));
            }
            other => panic!("expected ImageLoad, got {other:?}"),
        }
    }

    // Tests directory listing keeps image files only, sorted by name
    // Verified by removing the extension filter
    #[test]
    fn test_image_paths_filtered_and_sorted() {
        let dir = TempDir::new().unwrap();
        save_image(&RgbaImage::new(1, 1), dir.path().join("b.png")).unwrap();
        save_image(&RgbaImage::new(1, 1), dir.path().join("a.png")).unwrap();
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let names: Vec<String> = image_paths(dir.path())
            .unwrap()
            .iter()
            .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    // Tests undecodable images are skipped rather than failing the load
    // Verified by propagating decode errors
    #[test]
    fn test_load_directory_skips_corrupt_files() {
        let dir = TempDir::new().unwrap();
        save_image(&RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])), dir.path().join("good.png"))
            .unwrap();
        fs::write(dir.path().join("broken.png"), b"definitely not a png").unwrap();

        let images = load_directory(dir.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images.first().map(RgbaImage::dimensions), Some((2, 2)));
    }

    // Tests a missing directory is a file system error
    // Verified by returning an empty list for missing directories
    #[test]
    fn test_missing_directory() {
        assert!(matches!(
            load_directory("/nonexistent/tessera/tiles"),
            Err(MosaicError::FileSystem { .. })
        ));
    }

    // Tests thumbnails are written one file per id
    // Verified by naming every file after the first id
    #[test]
    fn test_export_thumbnails() {
        let dir = TempDir::new().unwrap();
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));

        let written = export_thumbnails(dir.path(), [(3, &red), (7, &blue)]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(load_image(dir.path().join("tile_0003.png")).unwrap(), red);
        assert_eq!(load_image(dir.path().join("tile_0007.png")).unwrap(), blue);
    }
}
