use std::path::PathBuf;
use std::thread;

use crossbeam_channel::bounded;
use tracing::info;

use crate::error::{PixmeanError, Result};
use crate::io::{list_source_files, probe_dimensions, Codec};
use crate::raster::{Dimensions, Raster};
use crate::stack::accumulator::Accumulator;
use crate::stack::reducer::reduce;

use super::accumulate::accumulate_images;
use super::config::{AverageConfig, PipelineConfig};
use super::loader::load_images;
use super::types::{ProgressReporter, RunStage, RunSummary, SkippedFile};

/// Run the loader and accumulator pools over `paths`.
///
/// Returns one partial accumulator per accumulator worker, plus every file
/// that was skipped. Stages are wired in dependency order: accumulators
/// start before loaders, the path queue is closed once fed, and the ingest
/// queue is closed only after every loader has been joined.
pub fn accumulate_paths(
    codec: &dyn Codec,
    paths: Vec<PathBuf>,
    dims: Dimensions,
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<(Vec<Accumulator>, Vec<SkippedFile>)> {
    config.validate()?;
    let workers = config.worker_count();
    let depth = config.depth;

    let (path_tx, path_rx) = bounded::<PathBuf>(config.path_queue_capacity);
    let (image_tx, image_rx) = bounded::<Raster>(config.image_queue_capacity);
    let (partial_tx, partial_rx) = bounded::<Accumulator>(workers);

    reporter.begin_stage(RunStage::PipelineRunning, Some(paths.len()));

    let skipped = thread::scope(|scope| -> Result<Vec<SkippedFile>> {
        let mut accumulators = Vec::with_capacity(workers);
        for worker in 0..workers {
            let images = image_rx.clone();
            let partials = partial_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("accumulate-{worker}"))
                .spawn_scoped(scope, move || {
                    accumulate_images(worker, images, partials, dims, depth, reporter)
                })?;
            accumulators.push(handle);
        }
        drop(image_rx);
        drop(partial_tx);

        let mut loaders = Vec::with_capacity(workers);
        for worker in 0..workers {
            let queue = path_rx.clone();
            let images = image_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("load-{worker}"))
                .spawn_scoped(scope, move || {
                    load_images(worker, queue, images, codec, dims, depth, reporter)
                })?;
            loaders.push(handle);
        }
        drop(path_rx);

        for path in paths {
            // Only fails once every loader is gone.
            if path_tx.send(path).is_err() {
                break;
            }
        }
        drop(path_tx);

        // Every handle is joined before any failure is reported; an
        // unjoined panicked thread would make the scope itself panic.
        let loader_results: Vec<_> = loaders.into_iter().map(|h| h.join()).collect();
        drop(image_tx);
        let accumulator_results: Vec<_> = accumulators.into_iter().map(|h| h.join()).collect();

        let mut skipped = Vec::new();
        let mut loader_panicked = false;
        for result in loader_results {
            match result {
                Ok(worker_skipped) => skipped.extend(worker_skipped),
                Err(_) => loader_panicked = true,
            }
        }
        if loader_panicked {
            return Err(PixmeanError::WorkerPanicked("loader"));
        }
        if accumulator_results.iter().any(|r| r.is_err()) {
            return Err(PixmeanError::WorkerPanicked("accumulator"));
        }
        Ok(skipped)
    })?;

    reporter.finish_stage();

    let partials: Vec<Accumulator> = partial_rx.try_iter().collect();
    if partials.len() != workers {
        return Err(PixmeanError::WorkerPanicked("accumulator"));
    }
    Ok((partials, skipped))
}

/// Average the images at `paths`, all expected to be `dims` in size.
pub fn average_paths(
    codec: &dyn Codec,
    paths: Vec<PathBuf>,
    dims: Dimensions,
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<(Raster, RunSummary)> {
    let files_considered = paths.len();
    let workers = config.worker_count();
    let (partials, skipped) = accumulate_paths(codec, paths, dims, config, reporter)?;

    reporter.begin_stage(RunStage::Reducing, Some(partials.len()));
    let total = reduce(partials, dims, config.depth)?;
    let images_folded = total.count();
    info!(images = images_folded, skipped = skipped.len(), "Merged partial sums");
    let raster = total.into_raster()?;
    reporter.finish_stage();

    let summary = RunSummary {
        dimensions: dims,
        workers,
        files_considered,
        images_folded,
        skipped,
    };
    Ok((raster, summary))
}

/// Average every image in `config.source` and write the result to
/// `config.target`.
///
/// The canonical dimensions are taken from the first file (by name). Files
/// that fail to decode are skipped; every other failure aborts the run.
pub fn run_average(
    config: &AverageConfig,
    codec: &dyn Codec,
    reporter: &dyn ProgressReporter,
) -> Result<RunSummary> {
    config.validate()?;

    reporter.begin_stage(RunStage::Enumerating, None);
    let paths = list_source_files(&config.source)?;
    reporter.finish_stage();
    info!(files = paths.len(), source = %config.source.display(), "Listed source files");

    let Some(reference) = paths.first() else {
        return Err(PixmeanError::EmptyResult);
    };

    reporter.begin_stage(RunStage::ProbingDimensions, Some(1));
    let dims = probe_dimensions(codec, reference)?;
    reporter.finish_stage();
    info!(
        width = dims.width,
        height = dims.height,
        reference = %reference.display(),
        "Canonical dimensions"
    );

    info!(
        workers = config.pipeline.worker_count(),
        depth = %config.pipeline.depth,
        "Starting pipeline"
    );
    let (raster, summary) = average_paths(codec, paths, dims, &config.pipeline, reporter)?;

    reporter.begin_stage(RunStage::Encoding, Some(1));
    codec.encode(&raster, &config.target)?;
    reporter.finish_stage();
    info!(target = %config.target.display(), "Saved averaged image");

    Ok(summary)
}
