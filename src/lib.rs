//! Concurrent photo-mosaic compositing
//!
//! A source image is cut into a grid of tiles and every tile is replaced by the candidate
//! thumbnail whose average color is closest to the region it covers. Candidates that were
//! just used cool down for a few cells so neighbouring regions do not repeat the same image,
//! and every chosen thumbnail is nudged toward the colors of the region it replaces.

#![forbid(unsafe_code)]

/// Candidate pool, matching, and the multi-threaded compositor
pub mod algorithm;
/// Region color extraction and per-pixel color correction
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Color arithmetic shared by matching and correction
pub mod math;
/// Grid partitioning, shared canvas and resampling
pub mod spatial;

pub use algorithm::artist::MosaicArtist;
pub use algorithm::easel::{CompositeOutcome, Easel, Placement};
pub use algorithm::library::CandidatePool;
pub use io::configuration::MosaicConfig;
pub use io::error::{MosaicError, Result};
