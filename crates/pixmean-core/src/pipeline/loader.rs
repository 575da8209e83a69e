use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::error::{PixmeanError, Result};
use crate::io::Codec;
use crate::raster::{Dimensions, Raster, SampleDepth};

use super::types::{ProgressReporter, SkippedFile};

/// Loader worker: decode each queued path and push it onto the ingest queue.
///
/// Returns the files that failed to decode or did not match the canonical
/// dimensions. Exits when the path queue is closed and drained.
pub(super) fn load_images(
    worker: usize,
    paths: Receiver<PathBuf>,
    images: Sender<Raster>,
    codec: &dyn Codec,
    dims: Dimensions,
    depth: SampleDepth,
    reporter: &dyn ProgressReporter,
) -> Vec<SkippedFile> {
    debug!(worker, "Loader started");
    let mut skipped = Vec::new();

    for path in paths.iter() {
        match load_image(codec, &path, dims, depth) {
            Ok(raster) => {
                // Only fails once every accumulator is gone.
                if images.send(raster).is_err() {
                    break;
                }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "Skipping image");
                reporter.advance(1);
                skipped.push(SkippedFile {
                    path,
                    reason: error.to_string(),
                });
            }
        }
    }

    debug!(worker, skipped = skipped.len(), "Loader finished");
    skipped
}

fn load_image(
    codec: &dyn Codec,
    path: &Path,
    dims: Dimensions,
    depth: SampleDepth,
) -> Result<Raster> {
    let raster = codec.decode(path, depth)?;
    let actual = raster.dimensions();
    if actual != dims {
        return Err(PixmeanError::DimensionMismatch {
            expected_width: dims.width,
            expected_height: dims.height,
            actual_width: actual.width,
            actual_height: actual.height,
        });
    }
    Ok(raster)
}
