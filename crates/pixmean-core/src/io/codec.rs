use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};

use crate::error::{PixmeanError, Result};
use crate::raster::{Dimensions, Raster, SampleDepth};

/// Format written when the target path has no recognised image extension.
pub const FALLBACK_OUTPUT_FORMAT: ImageFormat = ImageFormat::Jpeg;

/// Decode/encode capability used by the pipeline.
///
/// Implementations must be shareable across the loader workers.
pub trait Codec: Send + Sync {
    /// Read the width/height of an image without decoding its pixels.
    fn probe(&self, path: &Path) -> Result<Dimensions>;

    /// Fully decode an image into RGB samples at `depth`.
    fn decode(&self, path: &Path, depth: SampleDepth) -> Result<Raster>;

    /// Write `raster` to `path`, replacing any existing file.
    fn encode(&self, raster: &Raster, path: &Path) -> Result<()>;
}

/// `Codec` backed by the `image` crate.
///
/// Input formats are sniffed from file content; extensions are never
/// trusted. The output format follows the target extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCodec;

impl ImageCodec {
    fn open(path: &Path) -> std::io::Result<ImageReader<std::io::BufReader<std::fs::File>>> {
        ImageReader::open(path)?.with_guessed_format()
    }
}

impl Codec for ImageCodec {
    fn probe(&self, path: &Path) -> Result<Dimensions> {
        let probe_error = |reason: String| PixmeanError::DimensionProbe {
            path: path.to_path_buf(),
            reason,
        };
        let reader = Self::open(path).map_err(|e| probe_error(e.to_string()))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| probe_error(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path, depth: SampleDepth) -> Result<Raster> {
        let decode_error = |reason: String| PixmeanError::Decode {
            path: path.to_path_buf(),
            reason,
        };
        let img = Self::open(path)
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))?;

        Ok(match depth {
            SampleDepth::Eight => Raster::Rgb8(img.to_rgb8()),
            SampleDepth::Sixteen => Raster::Rgb16(img.to_rgb16()),
        })
    }

    fn encode(&self, raster: &Raster, path: &Path) -> Result<()> {
        let format = output_format(path);
        let result = match raster {
            Raster::Rgb8(img) => img.save_with_format(path, format),
            Raster::Rgb16(img) if holds_sixteen_bit(format) => img.save_with_format(path, format),
            Raster::Rgb16(img) => {
                let (w, h) = img.dimensions();
                let bytes = img.as_raw().iter().map(|&v| (v / 257) as u8).collect();
                let narrowed = RgbImage::from_raw(w, h, bytes)
                    .ok_or(PixmeanError::InvalidDimensions { width: w, height: h })?;
                DynamicImage::ImageRgb8(narrowed).save_with_format(path, format)
            }
        };
        result.map_err(|e| PixmeanError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Output format for `path`, chosen from its extension.
pub fn output_format(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path)
        .ok()
        .filter(|f| f.writing_enabled())
        .unwrap_or(FALLBACK_OUTPUT_FORMAT)
}

/// Whether `format` can store 16-bit RGB samples.
fn holds_sixteen_bit(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Png | ImageFormat::Tiff | ImageFormat::Pnm)
}
