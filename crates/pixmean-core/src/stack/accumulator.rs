use image::RgbImage;
use ndarray::Array3;
use rayon::prelude::*;

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{PixmeanError, Result};
use crate::raster::{Dimensions, Raster, Rgb16Image, SampleDepth};

/// Ratio between the 16-bit and 8-bit sample ranges (65535 / 255).
const DEPTH_SCALE: u64 = 257;

/// Running per-pixel channel sums over a set of images.
///
/// Sums live in one contiguous buffer of shape `(channel, row, col)`. Each
/// accumulator is owned by a single worker while folding and handed over by
/// value when that worker is done, so folding never takes a lock.
#[derive(Clone, Debug)]
pub struct Accumulator {
    sums: Array3<u64>,
    count: u64,
    dims: Dimensions,
    depth: SampleDepth,
}

impl Accumulator {
    pub fn new(dims: Dimensions, depth: SampleDepth) -> Self {
        Self {
            sums: Array3::zeros((
                COLOR_CHANNEL_COUNT,
                dims.height as usize,
                dims.width as usize,
            )),
            count: 0,
            dims,
            depth,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn depth(&self) -> SampleDepth {
        self.depth
    }

    /// Number of images folded in so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of `channel` (0 = R, 1 = G, 2 = B) at pixel `(x, y)`.
    pub fn sum(&self, channel: usize, x: u32, y: u32) -> u64 {
        self.sums[[channel, y as usize, x as usize]]
    }

    /// Add every pixel of `raster` into the running sums.
    ///
    /// A raster whose dimensions differ from the accumulator's is rejected
    /// and leaves the accumulator untouched. Rasters at the other sample
    /// depth are rescaled into this accumulator's depth.
    pub fn fold(&mut self, raster: &Raster) -> Result<()> {
        let actual = raster.dimensions();
        if actual != self.dims {
            return Err(PixmeanError::DimensionMismatch {
                expected_width: self.dims.width,
                expected_height: self.dims.height,
                actual_width: actual.width,
                actual_height: actual.height,
            });
        }

        match (raster, self.depth) {
            (Raster::Rgb8(img), SampleDepth::Eight) => self.add_samples(img.as_raw(), u64::from),
            (Raster::Rgb8(img), SampleDepth::Sixteen) => {
                self.add_samples(img.as_raw(), |v| u64::from(v) * DEPTH_SCALE)
            }
            (Raster::Rgb16(img), SampleDepth::Sixteen) => {
                self.add_samples(img.as_raw(), u64::from)
            }
            (Raster::Rgb16(img), SampleDepth::Eight) => {
                self.add_samples(img.as_raw(), |v| u64::from(v) / DEPTH_SCALE)
            }
        }

        self.count += 1;
        Ok(())
    }

    fn add_samples<S: Copy>(&mut self, samples: &[S], widen: impl Fn(S) -> u64) {
        let w = self.dims.width as usize;
        for (i, px) in samples.chunks_exact(COLOR_CHANNEL_COUNT).enumerate() {
            let (row, col) = (i / w, i % w);
            for (channel, &sample) in px.iter().enumerate() {
                self.sums[[channel, row, col]] += widen(sample);
            }
        }
    }

    /// Add another accumulator's sums and count into this one.
    pub fn merge(&mut self, other: &Accumulator) -> Result<()> {
        if other.dims != self.dims {
            return Err(PixmeanError::DimensionMismatch {
                expected_width: self.dims.width,
                expected_height: self.dims.height,
                actual_width: other.dims.width,
                actual_height: other.dims.height,
            });
        }
        if other.depth != self.depth {
            return Err(PixmeanError::DepthMismatch {
                expected: self.depth,
                actual: other.depth,
            });
        }

        self.sums += &other.sums;
        self.count += other.count;
        Ok(())
    }

    /// Divide every sum by the image count (floor division) and build the
    /// averaged image.
    pub fn into_raster(self) -> Result<Raster> {
        if self.count == 0 {
            return Err(PixmeanError::EmptyResult);
        }

        let samples = if self.dims.pixel_count() >= PARALLEL_PIXEL_THRESHOLD {
            self.mean_samples_parallel()
        } else {
            self.mean_samples_sequential()
        };

        let Dimensions { width, height } = self.dims;
        let raster = match self.depth {
            SampleDepth::Eight => {
                let bytes = samples.into_iter().map(|v| v as u8).collect();
                RgbImage::from_raw(width, height, bytes).map(Raster::Rgb8)
            }
            SampleDepth::Sixteen => Rgb16Image::from_raw(width, height, samples).map(Raster::Rgb16),
        };
        raster.ok_or(PixmeanError::InvalidDimensions { width, height })
    }

    fn mean_samples_sequential(&self) -> Vec<u16> {
        (0..self.dims.height as usize)
            .flat_map(|row| self.mean_row(row))
            .collect()
    }

    /// Row-parallel division using Rayon.
    fn mean_samples_parallel(&self) -> Vec<u16> {
        let rows: Vec<Vec<u16>> = (0..self.dims.height as usize)
            .into_par_iter()
            .map(|row| self.mean_row(row))
            .collect();
        rows.concat()
    }

    /// Interleaved RGB means for one row, clamped into the depth's range.
    fn mean_row(&self, row: usize) -> Vec<u16> {
        let w = self.dims.width as usize;
        let max = u64::from(self.depth.max_value());
        let mut out = Vec::with_capacity(w * COLOR_CHANNEL_COUNT);
        for col in 0..w {
            for channel in 0..COLOR_CHANNEL_COUNT {
                let mean = self.sums[[channel, row, col]] / self.count;
                out.push(mean.min(max) as u16);
            }
        }
        out
    }
}
