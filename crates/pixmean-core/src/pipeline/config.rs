use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_IMAGE_QUEUE_CAPACITY, DEFAULT_PATH_QUEUE_CAPACITY};
use crate::error::{PixmeanError, Result};
use crate::raster::SampleDepth;

/// A full averaging run. `source` and `target` may be left out of a config
/// file and supplied on the command line instead.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AverageConfig {
    /// Directory whose regular files are averaged.
    #[serde(default)]
    pub source: PathBuf,
    /// Output image path. Overwritten if it exists.
    #[serde(default)]
    pub target: PathBuf,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AverageConfig {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            pipeline: PipelineConfig::default(),
        }
    }

    /// Check that both paths are set and the pipeline sizing is usable.
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(PixmeanError::InvalidConfig(
                "source directory is not set".into(),
            ));
        }
        if self.target.as_os_str().is_empty() {
            return Err(PixmeanError::InvalidConfig("target image is not set".into()));
        }
        self.pipeline.validate()
    }
}

/// Sizing of the loader/accumulator worker pools and their queues.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Workers per stage. `None` uses the available hardware parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default = "default_path_queue_capacity")]
    pub path_queue_capacity: usize,
    #[serde(default = "default_image_queue_capacity")]
    pub image_queue_capacity: usize,
    #[serde(default)]
    pub depth: SampleDepth,
}

fn default_path_queue_capacity() -> usize {
    DEFAULT_PATH_QUEUE_CAPACITY
}

fn default_image_queue_capacity() -> usize {
    DEFAULT_IMAGE_QUEUE_CAPACITY
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: None,
            path_queue_capacity: DEFAULT_PATH_QUEUE_CAPACITY,
            image_queue_capacity: DEFAULT_IMAGE_QUEUE_CAPACITY,
            depth: SampleDepth::default(),
        }
    }
}

impl PipelineConfig {
    /// Effective number of workers in each stage.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(PixmeanError::InvalidConfig(
                "workers must be at least 1".into(),
            ));
        }
        if self.path_queue_capacity == 0 {
            return Err(PixmeanError::InvalidConfig(
                "path_queue_capacity must be at least 1".into(),
            ));
        }
        if self.image_queue_capacity == 0 {
            return Err(PixmeanError::InvalidConfig(
                "image_queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
