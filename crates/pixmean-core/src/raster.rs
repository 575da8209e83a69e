use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

/// 16-bit-per-channel RGB image buffer.
pub type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

/// Canonical width/height shared by every image in a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Native sample range that images are decoded into and written out in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleDepth {
    /// 0-255 per channel.
    #[default]
    Eight,
    /// 0-65535 per channel.
    Sixteen,
}

impl SampleDepth {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    pub fn max_value(&self) -> u16 {
        match self {
            Self::Eight => u8::MAX as u16,
            Self::Sixteen => u16::MAX,
        }
    }
}

impl std::fmt::Display for SampleDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// A decoded RGB image at one of the supported sample depths.
#[derive(Clone, Debug, PartialEq)]
pub enum Raster {
    Rgb8(RgbImage),
    Rgb16(Rgb16Image),
}

impl Raster {
    /// Image filled with a single color. Samples above the depth's range
    /// are clamped.
    pub fn solid(dims: Dimensions, depth: SampleDepth, rgb: [u16; 3]) -> Self {
        let [r, g, b] = rgb.map(|v| v.min(depth.max_value()));
        match depth {
            SampleDepth::Eight => Self::Rgb8(RgbImage::from_pixel(
                dims.width,
                dims.height,
                Rgb([r as u8, g as u8, b as u8]),
            )),
            SampleDepth::Sixteen => {
                Self::Rgb16(Rgb16Image::from_pixel(dims.width, dims.height, Rgb([r, g, b])))
            }
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = match self {
            Self::Rgb8(img) => img.dimensions(),
            Self::Rgb16(img) => img.dimensions(),
        };
        Dimensions { width, height }
    }

    pub fn depth(&self) -> SampleDepth {
        match self {
            Self::Rgb8(_) => SampleDepth::Eight,
            Self::Rgb16(_) => SampleDepth::Sixteen,
        }
    }

    /// RGB samples at `(x, y)`, widened to u16.
    pub fn pixel(&self, x: u32, y: u32) -> [u16; 3] {
        match self {
            Self::Rgb8(img) => img.get_pixel(x, y).0.map(u16::from),
            Self::Rgb16(img) => img.get_pixel(x, y).0,
        }
    }
}
