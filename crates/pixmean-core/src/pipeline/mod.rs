pub mod config;
mod accumulate;
mod loader;
mod orchestrator;
mod types;

pub use orchestrator::{accumulate_paths, average_paths, run_average};
pub use types::{NoOpReporter, ProgressReporter, RunStage, RunSummary, SkippedFile};
