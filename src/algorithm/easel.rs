//! Multi-threaded grid compositor
//!
//! The easel copies the source into a fresh canvas and lets a fixed number of workers pull
//! cells from a shared [`GridCursor`]. Each worker matches its cell through the
//! [`MosaicArtist`], paints the corrected tile, and sweeps the pool cooldowns once per
//! claimed cell. A worker error cancels the others and fails the build; a timeout
//! abandons the remaining cells and returns the canvas painted so far. Painting and
//! recording a placement happen under one lock, so the returned canvas and placements
//! always describe the same cells.

use crate::algorithm::artist::MosaicArtist;
use crate::algorithm::task_group::{CancelToken, TaskGroup};
use crate::io::configuration::{CANCEL_SETTLE_TIME, DEFAULT_SEED, DEFAULT_TIMEOUT, MosaicConfig};
use crate::io::error::{MosaicError, Result, WithContext};
use crate::spatial::canvas::SharedCanvas;
use crate::spatial::cursor::{Cell, GridCursor};
use image::{RgbaImage, imageops};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use ndarray::Array2;
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One painted grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Canvas rectangle that was painted
    pub cell: Cell,
    /// Pool id of the candidate painted there
    pub candidate: usize,
}

/// Result of a composite
#[derive(Debug, Clone)]
pub struct CompositeOutcome {
    /// Output image, same size as the source
    pub canvas: RgbaImage,
    /// Whether every cell was painted before the timeout
    pub completed: bool,
    /// Painted cells in row-major order
    pub placements: Vec<Placement>,
    /// Tile size the canvas was partitioned with (width, height)
    pub tile_size: (u32, u32),
}

impl CompositeOutcome {
    /// Cells that were claimed and painted, in row-major order
    pub fn cells(&self) -> Vec<Cell> {
        self.placements.iter().map(|placement| placement.cell).collect()
    }

    /// Sorted ids of every candidate painted at least once
    pub fn distinct_candidates(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .placements
            .iter()
            .map(|placement| placement.candidate)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Candidate id painted in each grid cell, indexed by (row, col)
    ///
    /// Cells left unpainted after a timeout are `None`.
    pub fn usage_grid(&self) -> Array2<Option<usize>> {
        let (tile_width, tile_height) = (self.tile_size.0.max(1), self.tile_size.1.max(1));
        let rows = self.canvas.height().div_ceil(tile_height) as usize;
        let cols = self.canvas.width().div_ceil(tile_width) as usize;

        let mut grid = Array2::from_elem((rows, cols), None);
        for placement in &self.placements {
            let (row, col) = placement.cell.grid_index(tile_width, tile_height);
            if let Some(slot) = grid.get_mut((row, col)) {
                *slot = Some(placement.candidate);
            }
        }
        grid
    }
}

/// Grid compositor running a fixed pool of worker threads
#[derive(Clone)]
pub struct Easel {
    workers: usize,
    timeout: Duration,
    seed: u64,
    progress: ProgressBar,
}

impl fmt::Debug for Easel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Easel")
            .field("workers", &self.workers)
            .field("timeout", &self.timeout)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for Easel {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl Easel {
    /// Create an easel with `workers` threads (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            timeout: DEFAULT_TIMEOUT,
            seed: DEFAULT_SEED,
            progress: ProgressBar::hidden(),
        }
    }

    /// Create an easel with the worker count, timeout and seed of `config`
    pub fn from_config(config: &MosaicConfig) -> Self {
        Self::new(config.workers)
            .with_timeout(config.timeout)
            .with_seed(config.seed)
    }

    /// Set how long a composite may run before it is abandoned
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the seed the per-worker random sources are derived from
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Report every painted cell on `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Number of worker threads
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Build a mosaic of `source` from the artist's candidates
    ///
    /// Cooldowns are reset before the first cell is claimed, so an artist can be reused
    /// across builds. After a timeout the workers are cancelled and given
    /// [`CANCEL_SETTLE_TIME`] to finish the cell in hand. A worker whose match outlasts
    /// that keeps sweeping the artist's cooldowns until its cell is done; wait until the
    /// artist's `Arc` is unique before relying on exact cooldowns in a following build.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A worker thread cannot be started
    /// - A cell cannot be matched (e.g. every candidate is cooling down)
    /// - A worker panics
    pub fn composite(
        &self,
        source: &RgbaImage,
        artist: &Arc<MosaicArtist>,
    ) -> Result<CompositeOutcome> {
        let tile_size = (artist.tile_width(), artist.tile_height());
        let started = Instant::now();

        let source = Arc::new(source.clone());
        let canvas = Arc::new(SharedCanvas::from_source(&source));
        let cursor = Arc::new(GridCursor::new(source.dimensions(), tile_size.0, tile_size.1));
        let painted = Arc::new(Mutex::new(Vec::with_capacity(cursor.cell_count())));
        cursor.reset();
        artist.reset_cooldowns();

        self.progress.set_length(cursor.cell_count() as u64);
        info!(
            "Compositing {}x{} canvas as {} cells of {}x{} on {} workers",
            source.width(),
            source.height(),
            cursor.cell_count(),
            tile_size.0,
            tile_size.1,
            self.workers
        );

        let mut group = TaskGroup::new("mosaic-worker").with_settle_time(CANCEL_SETTLE_TIME);
        for index in 0..self.workers {
            let worker = Worker {
                index,
                source: Arc::clone(&source),
                canvas: Arc::clone(&canvas),
                cursor: Arc::clone(&cursor),
                painted: Arc::clone(&painted),
                artist: Arc::clone(artist),
                rng: StdRng::seed_from_u64(self.seed.wrapping_add(index as u64)),
                progress: self.progress.clone(),
            };
            if let Err(error) = group.spawn(move |token| worker.run(&token)) {
                group.token().cancel();
                return Err(error);
            }
        }

        let outcome = group.join_timeout(self.timeout);
        if let Some(&worker) = outcome.panicked.first() {
            return Err(MosaicError::WorkerPanicked { worker });
        }

        for (_, result) in outcome.finished {
            result?;
        }

        // Detached workers paint under the same lock, so nothing lands between the two reads
        let mut recorded = painted.lock();
        let canvas = Arc::try_unwrap(canvas)
            .map_or_else(|shared| shared.snapshot(), SharedCanvas::into_inner);
        let mut placements = std::mem::take(&mut *recorded);
        drop(recorded);
        placements.sort_by_key(|placement| placement.cell);

        let completed = !outcome.timed_out;
        if completed {
            self.progress.finish_and_clear();
            info!(
                "Composited {} cells in {:.2?}",
                placements.len(),
                started.elapsed()
            );
        } else {
            self.progress.abandon();
            warn!(
                "Compositing timed out after {:.2?}; {} of {} cells painted",
                self.timeout,
                placements.len(),
                cursor.cell_count()
            );
        }

        Ok(CompositeOutcome {
            canvas,
            completed,
            placements,
            tile_size,
        })
    }
}

struct Worker {
    index: usize,
    source: Arc<RgbaImage>,
    canvas: Arc<SharedCanvas>,
    cursor: Arc<GridCursor>,
    painted: Arc<Mutex<Vec<Placement>>>,
    artist: Arc<MosaicArtist>,
    rng: StdRng,
    progress: ProgressBar,
}

impl Worker {
    fn run(mut self, token: &CancelToken) -> Result<()> {
        while !token.is_cancelled() {
            let Some(cell) = self.cursor.claim() else {
                break;
            };
            debug!("Worker {} painting cell ({}, {})", self.index, cell.x, cell.y);

            let region =
                imageops::crop_imm(&*self.source, cell.x, cell.y, cell.width, cell.height)
                    .to_image();
            let matched = self
                .artist
                .tile_for_region(&region, &mut self.rng)
                .with_cell(cell.x, cell.y);
            self.artist.cool_down();

            match matched {
                Ok(tile) => {
                    let mut painted = self.painted.lock();
                    self.canvas.paint(cell.x, cell.y, &tile.pixels);
                    painted.push(Placement {
                        cell,
                        candidate: tile.candidate,
                    });
                    drop(painted);
                    self.progress.inc(1);
                }
                Err(error) => {
                    token.cancel();
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}
