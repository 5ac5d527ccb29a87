//! Command-line interface for building a mosaic from a directory of candidate images

use crate::algorithm::artist::MosaicArtist;
use crate::algorithm::easel::{CompositeOutcome, Easel};
use crate::algorithm::library::CandidatePool;
use crate::io::configuration::{DEFAULT_SEED, DEFAULT_TIMEOUT, MIN_TILE_IMAGES, MosaicConfig};
use crate::io::error::{MosaicError, Result};
use crate::io::image::{export_thumbnails, load_directory, load_image, save_image};
use crate::io::progress::ProgressReporter;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug, Clone)]
#[command(name = "tessera")]
#[command(
    author,
    version,
    about = "Rebuild an image as a mosaic of color-matched candidate tiles"
)]
/// Command-line arguments for the mosaic builder
pub struct Cli {
    /// Image to rebuild
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory of candidate images
    #[arg(short, long, value_name = "DIR")]
    pub tiles_dir: PathBuf,

    /// Where to write the mosaic (format taken from the extension)
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Tile width in pixels (falls back to 10 if zero or wider than the input)
    #[arg(long)]
    pub tile_width: Option<u32>,

    /// Tile height in pixels (falls back to 10 if zero or taller than the input)
    #[arg(long)]
    pub tile_height: Option<u32>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Random seed for reproducible tie-breaking
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Seconds to wait before saving whatever has been painted
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Distance above the best match still considered a match
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Cells a chosen candidate stays unavailable for
    #[arg(long)]
    pub spacing: Option<u32>,

    /// Largest per-channel color correction step
    #[arg(long)]
    pub intensity: Option<u8>,

    /// Also write every distinct candidate used into this directory
    #[arg(long, value_name = "DIR")]
    pub used_tiles: Option<PathBuf>,

    /// Suppress progress output and informational logging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Install the logger; `RUST_LOG` overrides the default level
    pub fn init_logging(&self) {
        let level = if self.quiet { "warn" } else { "info" };
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp_millis()
            .try_init();
    }

    /// Map the arguments onto a configuration for an input of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid
    pub fn config(&self, image_dimensions: (u32, u32)) -> Result<MosaicConfig> {
        let mut config = MosaicConfig::default().with_tile_size(
            self.tile_width,
            self.tile_height,
            image_dimensions,
        );
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.seed = self.seed;
        config.timeout = Duration::from_secs(self.timeout);
        if let Some(tolerance) = self.tolerance {
            config.selection.tolerance = tolerance;
        }
        if let Some(spacing) = self.spacing {
            config.selection.tile_spacing = spacing;
        }
        if let Some(intensity) = self.intensity {
            config.correction_intensity = intensity;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Runs one mosaic build from parsed arguments
pub struct MosaicApp {
    cli: Cli,
    progress: ProgressReporter,
}

impl MosaicApp {
    /// Create an application for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress = ProgressReporter::new(cli.quiet);
        Self { cli, progress }
    }

    /// Arguments this application runs with
    pub const fn cli(&self) -> &Cli {
        &self.cli
    }

    /// Load the inputs, build the mosaic and write the outputs
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input image or the candidate directory cannot be read
    /// - Fewer than the minimum number of candidate images are found
    /// - The arguments do not form a valid configuration
    /// - Compositing fails
    /// - An output cannot be written
    pub fn run(mut self) -> Result<CompositeOutcome> {
        let started = Instant::now();

        let source = load_image(&self.cli.input)?;
        let images = load_directory(&self.cli.tiles_dir)?;
        if images.len() < MIN_TILE_IMAGES {
            return Err(MosaicError::InsufficientTiles {
                path: self.cli.tiles_dir.clone(),
                found: images.len(),
                required: MIN_TILE_IMAGES,
            });
        }
        info!(
            "Loaded {}x{} input and {} candidate images",
            source.width(),
            source.height(),
            images.len()
        );

        let config = self.cli.config(source.dimensions())?;

        let library_bar = self.progress.stage("Library", images.len() as u64);
        let pool = CandidatePool::build_with_progress(
            &images,
            config.tile_width,
            config.tile_height,
            config.workers,
            &library_bar,
        )?;
        library_bar.finish_and_clear();
        drop(images);

        let artist = Arc::new(MosaicArtist::from_config(pool, &config)?);
        let composite_bar = self.progress.stage("Mosaic", 0);
        let easel = Easel::from_config(&config).with_progress(composite_bar);
        let outcome = easel.composite(&source, &artist);
        self.progress.finish();
        let outcome = outcome?;

        save_image(&outcome.canvas, &self.cli.output)?;
        if !outcome.completed {
            warn!(
                "Saved a partial mosaic to {} ({} cells painted)",
                self.cli.output.display(),
                outcome.placements.len()
            );
        }

        if let Some(dir) = &self.cli.used_tiles {
            let used = outcome.distinct_candidates();
            let written = export_thumbnails(
                dir,
                used.iter()
                    .filter_map(|&id| artist.thumbnail(id).map(|thumbnail| (id, thumbnail))),
            )?;
            info!("Wrote {written} used tiles to {}", dir.display());
        }

        info!(
            "Wrote {} using {} distinct tiles in {:.2?}",
            self.cli.output.display(),
            outcome.distinct_candidates().len(),
            started.elapsed()
        );
        Ok(outcome)
    }
}
