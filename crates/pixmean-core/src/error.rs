use std::path::PathBuf;

use thiserror::Error;

use crate::raster::SampleDepth;

#[derive(Error, Debug)]
pub enum PixmeanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot list source directory {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read dimensions of {path}: {reason}")]
    DimensionProbe { path: PathBuf, reason: String },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Accumulator holds {expected} samples, got {actual}")]
    DepthMismatch {
        expected: SampleDepth,
        actual: SampleDepth,
    },

    #[error("Cannot write {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error("No images were successfully decoded")]
    EmptyResult,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0} worker thread panicked")]
    WorkerPanicked(&'static str),
}

pub type Result<T> = std::result::Result<T, PixmeanError>;
