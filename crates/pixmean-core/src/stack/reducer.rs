use tracing::debug;

use crate::error::Result;
use crate::raster::{Dimensions, Raster, SampleDepth};

use super::accumulator::Accumulator;

/// Merge partial accumulators into one grand total.
pub fn reduce<I>(partials: I, dims: Dimensions, depth: SampleDepth) -> Result<Accumulator>
where
    I: IntoIterator<Item = Accumulator>,
{
    let mut total = Accumulator::new(dims, depth);
    for (i, partial) in partials.into_iter().enumerate() {
        debug!(partial = i, images = partial.count(), "Merging partial sum");
        total.merge(&partial)?;
    }
    Ok(total)
}

/// Merge partial accumulators and divide by the total image count.
///
/// Fails with `EmptyResult` when no image was folded into any partial.
pub fn average<I>(partials: I, dims: Dimensions, depth: SampleDepth) -> Result<Raster>
where
    I: IntoIterator<Item = Accumulator>,
{
    reduce(partials, dims, depth)?.into_raster()
}
