//! Candidate pool construction
//!
//! Source images are split into contiguous shards, one per worker. Each worker resamples
//! its shard to the tile size independently and the shards are concatenated in order, so
//! the pool order always matches the input order.

use crate::algorithm::shape::CandidateShape;
use crate::io::error::{MosaicError, Result};
use image::RgbaImage;
use indicatif::ProgressBar;
use log::{debug, info};
use std::ops::Range;
use std::thread;

/// Insertion-ordered set of candidate tiles shared by all compositing workers
///
/// Never resized after construction; the only mutation is each shape's own cooldown.
#[derive(Debug)]
pub struct CandidatePool {
    shapes: Vec<CandidateShape>,
    tile_width: u32,
    tile_height: u32,
}

impl CandidatePool {
    /// Build a pool from source images of any size
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `images` is empty
    /// - An image cannot be resampled to the tile size
    /// - A worker thread panics
    pub fn build(
        images: &[RgbaImage],
        tile_width: u32,
        tile_height: u32,
        workers: usize,
    ) -> Result<Self> {
        Self::build_with_progress(
            images,
            tile_width,
            tile_height,
            workers,
            &ProgressBar::hidden(),
        )
    }

    /// Build a pool, ticking `progress` once per finished candidate
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `images` is empty
    /// - An image cannot be resampled to the tile size
    /// - A worker thread panics
    pub fn build_with_progress(
        images: &[RgbaImage],
        tile_width: u32,
        tile_height: u32,
        workers: usize,
        progress: &ProgressBar,
    ) -> Result<Self> {
        if images.is_empty() {
            return Err(MosaicError::NoCandidates);
        }

        let shards = shard_ranges(images.len(), workers);
        info!(
            "Building {} candidates at {tile_width}x{tile_height} on {} workers",
            images.len(),
            shards.len()
        );

        let shard_results: Vec<Result<Vec<CandidateShape>>> = thread::scope(|scope| {
            let handles: Vec<_> = shards
                .iter()
                .cloned()
                .map(|range| {
                    let progress = progress.clone();
                    scope.spawn(move || build_shard(images, range, tile_width, tile_height, &progress))
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|_| Err(MosaicError::WorkerPanicked { worker }))
                })
                .collect()
        });

        let mut shapes = Vec::with_capacity(images.len());
        for shard in shard_results {
            shapes.extend(shard?);
        }
        Self::from_shapes(shapes)
    }

    /// Build a pool from thumbnails that already have the tile size
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `thumbnails` is empty
    /// - A thumbnail is empty
    /// - The thumbnails do not all share the same dimensions
    pub fn from_thumbnails(thumbnails: Vec<RgbaImage>) -> Result<Self> {
        let shapes = thumbnails
            .into_iter()
            .enumerate()
            .map(|(id, thumbnail)| CandidateShape::new(id, thumbnail))
            .collect::<Result<Vec<_>>>()?;
        Self::from_shapes(shapes)
    }

    fn from_shapes(shapes: Vec<CandidateShape>) -> Result<Self> {
        let (tile_width, tile_height) = shapes
            .first()
            .map(CandidateShape::dimensions)
            .ok_or(MosaicError::NoCandidates)?;

        if let Some(odd) = shapes
            .iter()
            .find(|shape| shape.dimensions() != (tile_width, tile_height))
        {
            return Err(MosaicError::DimensionMismatch {
                requested: odd.dimensions(),
                bounds: (tile_width, tile_height),
            });
        }

        Ok(Self {
            shapes,
            tile_width,
            tile_height,
        })
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the pool has no candidates (never true for a constructed pool)
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Width of every thumbnail
    pub const fn tile_width(&self) -> u32 {
        self.tile_width
    }

    /// Height of every thumbnail
    pub const fn tile_height(&self) -> u32 {
        self.tile_height
    }

    /// Candidate with the given id
    pub fn get(&self, id: usize) -> Option<&CandidateShape> {
        self.shapes.get(id)
    }

    /// All candidates in pool order
    pub fn shapes(&self) -> &[CandidateShape] {
        &self.shapes
    }

    /// Iterate candidates in pool order
    pub fn iter(&self) -> std::slice::Iter<'_, CandidateShape> {
        self.shapes.iter()
    }

    /// Number of candidates not cooling down
    pub fn available_count(&self) -> usize {
        self.shapes.iter().filter(|shape| shape.is_available()).count()
    }

    /// Count every candidate's cooldown down by one
    ///
    /// Runs once per composited cell, so recently used candidates return after a fixed
    /// number of cells regardless of how often they are looked at.
    pub fn cool_down(&self) {
        for shape in &self.shapes {
            shape.decrease_cooldown();
        }
    }

    /// Make every candidate available again
    pub fn reset_cooldowns(&self) {
        for shape in &self.shapes {
            shape.reset_cooldown();
        }
    }
}

impl<'a> IntoIterator for &'a CandidatePool {
    type Item = &'a CandidateShape;
    type IntoIter = std::slice::Iter<'a, CandidateShape>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split `len` items into contiguous shards for `workers` workers
///
/// Every shard holds `len / workers` items and the last one also takes the remainder.
/// The worker count is capped at `len` so no shard is empty.
pub fn shard_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let shard_count = workers.clamp(1, len.max(1));
    let shard_size = len / shard_count;

    (0..shard_count)
        .map(|index| {
            let start = index * shard_size;
            let end = if index + 1 == shard_count {
                len
            } else {
                start + shard_size
            };
            start..end
        })
        .collect()
}

fn build_shard(
    images: &[RgbaImage],
    range: Range<usize>,
    tile_width: u32,
    tile_height: u32,
    progress: &ProgressBar,
) -> Result<Vec<CandidateShape>> {
    debug!("Building candidates {}..{}", range.start, range.end);
    let mut shapes = Vec::with_capacity(range.len());
    for id in range {
        let Some(source) = images.get(id) else {
            break;
        };
        shapes.push(CandidateShape::from_source(
            id,
            source,
            tile_width,
            tile_height,
        )?);
        progress.inc(1);
    }
    Ok(shapes)
}
