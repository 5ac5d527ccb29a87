//! Error types and context management for mosaic operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A color was requested for a region that contains no pixels
    InvalidRegion {
        /// Region width in pixels
        width: u32,
        /// Region height in pixels
        height: u32,
        /// Grid cell the region belongs to, when known
        cell: Option<[u32; 2]>,
    },

    /// The candidate image list was empty
    NoCandidates,

    /// Every candidate in the pool was cooling down when a match was requested
    ///
    /// Happens when the pool is too small for the configured tile spacing
    AllTilesDisabled {
        /// Number of candidates in the pool
        pool_size: usize,
        /// Grid cell being matched, when known
        cell: Option<[u32; 2]>,
    },

    /// A region or image exceeds the tile bounds it is matched against
    DimensionMismatch {
        /// Dimensions that were requested (width, height)
        requested: (u32, u32),
        /// Largest dimensions allowed (width, height)
        bounds: (u32, u32),
    },

    /// Resampling was asked for an impossible output size
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Explanation of why the size is invalid
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Fewer candidate images were supplied than the tool requires
    InsufficientTiles {
        /// Directory that was scanned
        path: PathBuf,
        /// Number of images found
        found: usize,
        /// Minimum number of images required
        required: usize,
    },

    /// The operating system refused to start a worker thread
    WorkerSpawn {
        /// Index of the worker that failed to start
        worker: usize,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A worker thread panicked while processing
    WorkerPanicked {
        /// Index of the worker that panicked
        worker: usize,
    },
}

fn describe_cell(cell: Option<[u32; 2]>) -> String {
    cell.map_or_else(String::new, |[x, y]| format!(" at cell ({x}, {y})"))
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::InvalidRegion {
                width,
                height,
                cell,
            } => {
                write!(
                    f,
                    "Region {width}x{height}{} contains no pixels",
                    describe_cell(*cell)
                )
            }
            Self::NoCandidates => write!(f, "No candidate images were provided"),
            Self::AllTilesDisabled { pool_size, cell } => {
                write!(
                    f,
                    "All {pool_size} candidates are cooling down{}",
                    describe_cell(*cell)
                )
            }
            Self::DimensionMismatch { requested, bounds } => {
                write!(
                    f,
                    "Requested {}x{} exceeds tile bounds {}x{}",
                    requested.0, requested.1, bounds.0, bounds.1
                )
            }
            Self::InvalidDimensions {
                width,
                height,
                reason,
            } => {
                write!(f, "Cannot resample to {width}x{height}: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InsufficientTiles {
                path,
                found,
                required,
            } => {
                write!(
                    f,
                    "Found {found} images in '{}', at least {required} are required",
                    path.display()
                )
            }
            Self::WorkerSpawn { worker, source } => {
                write!(f, "Failed to start worker {worker}: {source}")
            }
            Self::WorkerPanicked { worker } => write!(f, "Worker {worker} panicked"),
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } | Self::WorkerSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorContext {
    /// Grid cell (x, y) being processed
    pub cell: Option<[u32; 2]>,
}

/// Enriches error messages with compositing state
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the grid cell context
    ///
    /// # Errors
    ///
    /// Propagates the original error with the cell position applied
    fn with_cell(self, x: u32, y: u32) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<MosaicError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            // Only per-cell errors carry a position
            match &mut error {
                MosaicError::InvalidRegion { cell, .. }
                | MosaicError::AllTilesDisabled { cell, .. } => {
                    if context.cell.is_some() {
                        *cell = context.cell;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_cell(self, x: u32, y: u32) -> Result<T> {
        self.with_context(ErrorContext {
            cell: Some([x, y]),
        })
    }
}

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for MosaicError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
