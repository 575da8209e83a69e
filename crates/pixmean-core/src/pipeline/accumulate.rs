use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::raster::{Dimensions, Raster, SampleDepth};
use crate::stack::accumulator::Accumulator;

use super::types::ProgressReporter;

/// Accumulator worker: fold every decoded image into a private accumulator,
/// then hand it over on `partials` once the ingest queue is closed and
/// drained.
pub(super) fn accumulate_images(
    worker: usize,
    images: Receiver<Raster>,
    partials: Sender<Accumulator>,
    dims: Dimensions,
    depth: SampleDepth,
    reporter: &dyn ProgressReporter,
) {
    debug!(worker, "Accumulator started");
    let mut acc = Accumulator::new(dims, depth);

    for raster in images.iter() {
        if let Err(error) = acc.fold(&raster) {
            warn!(worker, %error, "Dropping image");
        }
        reporter.advance(1);
    }

    debug!(worker, images = acc.count(), "Accumulator finished");
    // `partials` has one slot per worker, so this never blocks. It only
    // fails if the orchestrator already gave up on the run.
    let _ = partials.send(acc);
}
