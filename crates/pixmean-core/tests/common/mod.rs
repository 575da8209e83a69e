use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use image::{Rgb, RgbImage};

use pixmean_core::error::{PixmeanError, Result};
use pixmean_core::io::Codec;
use pixmean_core::pipeline::config::PipelineConfig;
use pixmean_core::pipeline::{ProgressReporter, RunStage};
use pixmean_core::raster::{Dimensions, Raster, SampleDepth};

/// Write a solid-color 8-bit PNG into `dir` and return its path.
pub fn write_solid_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    write_png(dir, name, &RgbImage::from_pixel(width, height, Rgb(rgb)))
}

/// Write an arbitrary 8-bit RGB image as PNG into `dir`.
pub fn write_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("write PNG fixture");
    path
}

/// Write a file that no codec can decode.
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("write garbage fixture");
    path
}

/// Deterministic non-uniform test pattern.
pub fn gradient_image(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 37 + y * 11 + seed * 7) % 256) as u8,
            ((x * 5 + y * 53 + seed * 13) % 256) as u8,
            ((x * y + seed * 29) % 256) as u8,
        ])
    })
}

pub fn pipeline_config(workers: usize) -> PipelineConfig {
    PipelineConfig {
        workers: Some(workers),
        ..Default::default()
    }
}

/// In-memory codec keyed by path. Unknown paths fail to decode.
pub struct MemoryCodec {
    pub images: HashMap<PathBuf, Raster>,
    pub encoded: Mutex<Option<(PathBuf, Raster)>>,
}

impl MemoryCodec {
    pub fn new(images: impl IntoIterator<Item = (PathBuf, Raster)>) -> Self {
        Self {
            images: images.into_iter().collect(),
            encoded: Mutex::new(None),
        }
    }
}

impl Codec for MemoryCodec {
    fn probe(&self, path: &Path) -> Result<Dimensions> {
        self.images
            .get(path)
            .map(Raster::dimensions)
            .ok_or_else(|| PixmeanError::DimensionProbe {
                path: path.to_path_buf(),
                reason: "not in memory".into(),
            })
    }

    fn decode(&self, path: &Path, _depth: SampleDepth) -> Result<Raster> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| PixmeanError::Decode {
                path: path.to_path_buf(),
                reason: "not in memory".into(),
            })
    }

    fn encode(&self, raster: &Raster, path: &Path) -> Result<()> {
        *self.encoded.lock().unwrap() = Some((path.to_path_buf(), raster.clone()));
        Ok(())
    }
}

/// Counts progress events so tests can check every file was accounted for.
#[derive(Default)]
pub struct CountingReporter {
    pub advanced: AtomicUsize,
    pub stages: Mutex<Vec<RunStage>>,
}

impl ProgressReporter for CountingReporter {
    fn begin_stage(&self, stage: RunStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }

    fn advance(&self, items_done: usize) {
        self.advanced.fetch_add(items_done, Ordering::SeqCst);
    }
}
