use std::path::PathBuf;

use crate::raster::Dimensions;

/// Stage of an averaging run, used for progress reporting.
///
/// A run moves through these in order; failure at any stage ends the run
/// with an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStage {
    Enumerating,
    ProbingDimensions,
    PipelineRunning,
    Reducing,
    Encoding,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enumerating => write!(f, "Listing source files"),
            Self::ProbingDimensions => write!(f, "Probing dimensions"),
            Self::PipelineRunning => write!(f, "Accumulating images"),
            Self::Reducing => write!(f, "Merging partial sums"),
            Self::Encoding => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting for a run.
///
/// `advance` is called from worker threads, once per file that is either
/// folded or skipped. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage, if known.
    fn begin_stage(&self, _stage: RunStage, _total_items: Option<usize>) {}

    /// Work items within the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A file left out of the average, and why.
#[derive(Clone, Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub dimensions: Dimensions,
    pub workers: usize,
    pub files_considered: usize,
    pub images_folded: u64,
    pub skipped: Vec<SkippedFile>,
}
