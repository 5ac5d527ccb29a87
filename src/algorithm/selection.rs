use crate::{
    algorithm::{library::CandidatePool, shape::CandidateShape},
    io::configuration::{EPS, LIST_SIZE, MIN_PICTURES, TILE_SPACING, TOLERANCE},
    io::error::{MosaicError, Result, invalid_parameter},
    math::color::color_distance,
};
use image::Rgba;
use log::trace;
use rand::Rng;

/// Parameters of the nearest-color search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionParams {
    /// Capacity of the near-best shortlist (exact ties may exceed it)
    pub list_size: usize,
    /// Maximum distance above the best match that still counts as a match
    pub tolerance: f64,
    /// Distances closer than this are treated as ties
    pub eps: f64,
    /// Smallest shortlist size kept by pruning and restored from evicted entries
    pub min_pictures: usize,
    /// Cooldown armed on the chosen candidate
    pub tile_spacing: u32,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            list_size: LIST_SIZE,
            tolerance: TOLERANCE,
            eps: EPS,
            min_pictures: MIN_PICTURES,
            tile_spacing: TILE_SPACING,
        }
    }
}

impl SelectionParams {
    /// Check that the parameters describe a usable search
    ///
    /// # Errors
    ///
    /// Returns an error if the shortlist capacity or minimum is zero, or if the tolerance
    /// or tie threshold is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if self.list_size == 0 {
            return Err(invalid_parameter(
                "list_size",
                &self.list_size,
                &"shortlist needs room for at least one candidate",
            ));
        }
        if self.min_pictures == 0 {
            return Err(invalid_parameter(
                "min_pictures",
                &self.min_pictures,
                &"must keep at least one candidate",
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(invalid_parameter(
                "tolerance",
                &self.tolerance,
                &"must be a non-negative distance",
            ));
        }
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(invalid_parameter(
                "eps",
                &self.eps,
                &"must be a non-negative distance",
            ));
        }
        Ok(())
    }
}

/// Candidate kept on the shortlist together with its distance to the target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShortlistEntry {
    /// Pool id of the candidate
    pub id: usize,
    /// Color distance to the target
    pub distance: f64,
}

/// Collect the near-best available candidates for a target color
///
/// Scans the pool once in order, skipping candidates that are cooling down. Exact ties
/// with the best distance are always kept; a new best evicts the oldest entry when the
/// shortlist is full and drops the previous best if it was worse by more than the
/// tolerance. Afterwards everything outside `best + tolerance` is pruned, worst first,
/// while more than `min_pictures` entries remain. A shortlist left shorter than
/// `min_pictures` is topped up with the nearest evicted entries. Entries are returned in
/// pool order.
///
/// # Errors
///
/// Returns [`MosaicError::AllTilesDisabled`] if every candidate is cooling down
pub fn build_shortlist(
    target: Rgba<u8>,
    pool: &CandidatePool,
    params: &SelectionParams,
) -> Result<Vec<ShortlistEntry>> {
    let mut available = pool
        .iter()
        .filter(|shape| shape.is_available())
        .map(|shape| ShortlistEntry {
            id: shape.id(),
            distance: color_distance(target, shape.average_color()),
        });

    let first = available.next().ok_or(MosaicError::AllTilesDisabled {
        pool_size: pool.len(),
        cell: None,
    })?;

    let mut shortlist = Vec::with_capacity(params.list_size + 1);
    let mut evicted = Vec::new();
    let mut closest_dist = first.distance;
    shortlist.push(first);

    for entry in available {
        if (entry.distance - closest_dist).abs() < params.eps {
            shortlist.push(entry);
        } else if entry.distance < closest_dist {
            if shortlist.len() >= params.list_size && !shortlist.is_empty() {
                evicted.push(shortlist.remove(0));
            }
            if closest_dist - entry.distance > params.tolerance {
                evict_previous_best(&mut shortlist, &mut evicted, closest_dist, params.eps);
            }
            shortlist.push(entry);
            closest_dist = entry.distance;
        }
    }

    prune_outside_tolerance(&mut shortlist, closest_dist, params);
    refill_from_evicted(&mut shortlist, evicted, params.min_pictures);
    Ok(shortlist)
}

// The previous best and its ties always sit at the back: every push is a tie or a new best
fn evict_previous_best(
    shortlist: &mut Vec<ShortlistEntry>,
    evicted: &mut Vec<ShortlistEntry>,
    previous_best: f64,
    eps: f64,
) {
    while shortlist
        .last()
        .is_some_and(|last| (last.distance - previous_best).abs() < eps)
    {
        if let Some(entry) = shortlist.pop() {
            evicted.push(entry);
        }
    }
}

fn prune_outside_tolerance(
    shortlist: &mut Vec<ShortlistEntry>,
    closest_dist: f64,
    params: &SelectionParams,
) {
    let limit = closest_dist + params.tolerance;
    while shortlist.len() > params.min_pictures {
        let worst = shortlist
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.distance > limit)
            .max_by(|(_, a), (_, b)| a.distance.total_cmp(&b.distance))
            .map(|(index, _)| index);

        match worst {
            Some(index) => {
                shortlist.remove(index);
            }
            None => break,
        }
    }
}

fn refill_from_evicted(
    shortlist: &mut Vec<ShortlistEntry>,
    mut evicted: Vec<ShortlistEntry>,
    min_pictures: usize,
) {
    let missing = min_pictures.saturating_sub(shortlist.len());
    if missing == 0 || evicted.is_empty() {
        return;
    }

    evicted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    shortlist.extend(evicted.into_iter().take(missing));
    shortlist.sort_by_key(|entry| entry.id);
}

/// Choose a candidate for a target color and arm its cooldown
///
/// Picks uniformly among the shortlist built by [`build_shortlist`]. A pick that another
/// worker armed in the meantime is dropped and the pick repeated; when the shortlist runs
/// dry the pool is scanned again. The returned shape was available when this call armed it.
///
/// # Errors
///
/// Returns [`MosaicError::AllTilesDisabled`] if every candidate is cooling down
pub fn find_nearest<'a, R>(
    target: Rgba<u8>,
    pool: &'a CandidatePool,
    params: &SelectionParams,
    rng: &mut R,
) -> Result<&'a CandidateShape>
where
    R: Rng,
{
    loop {
        let mut shortlist = build_shortlist(target, pool, params)?;
        trace!("Shortlist size: {}", shortlist.len());

        while !shortlist.is_empty() {
            let pick = rng.random_range(0..shortlist.len());
            let entry = shortlist.swap_remove(pick);
            if let Some(shape) = pool.get(entry.id)
                && shape.try_arm(params.tile_spacing)
            {
                return Ok(shape);
            }
        }
    }
}
