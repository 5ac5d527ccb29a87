//! Image decoding, encoding and candidate directory loading

use crate::io::error::{MosaicError, Result};
use image::{ImageFormat, RgbaImage};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Decode an image file into an RGBA buffer
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Paths of every file in `dir` with a recognized image extension, sorted by name
///
/// # Errors
///
/// Returns an error if the directory cannot be listed
pub fn image_paths<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|source| MosaicError::FileSystem {
        path: dir.to_path_buf(),
        operation: "list directory",
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| MosaicError::FileSystem {
                path: dir.to_path_buf(),
                operation: "read directory entry",
                source,
            })?
            .path();
        if path.is_file() && ImageFormat::from_path(&path).is_ok() {
            paths.push(path);
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decode every image in `dir`
///
/// Files that carry an image extension but fail to decode are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed
pub fn load_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<RgbaImage>> {
    let paths = image_paths(dir)?;
    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        match load_image(path) {
            Ok(image) => {
                debug!("Read {}", path.display());
                images.push(image);
            }
            Err(error) => warn!("{error}"),
        }
    }
    Ok(images)
}

/// Encode an image, choosing the format from the file extension
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The extension does not name a supported format
/// - The image cannot be written
pub fn save_image<P: AsRef<Path>>(image: &RgbaImage, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| MosaicError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }

    image.save(path).map_err(|source| MosaicError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}

/// Write thumbnails as `tile_<id>.png` into `dir`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a thumbnail cannot be written
pub fn export_thumbnails<'a, P, I>(dir: P, thumbnails: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (usize, &'a RgbaImage)>,
{
    let dir = dir.as_ref();
    let mut written = 0;
    for (id, thumbnail) in thumbnails {
        save_image(thumbnail, dir.join(format!("tile_{id:04}.png")))?;
        written += 1;
    }
    Ok(written)
}
