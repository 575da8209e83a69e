use std::path::Path;

use crate::error::{PixmeanError, Result};
use crate::raster::Dimensions;

use super::codec::Codec;

/// Determine the canonical dimensions for a run from one reference image.
///
/// Only the header is read. An empty image is rejected because nothing
/// could be accumulated into it.
pub fn probe_dimensions(codec: &dyn Codec, path: &Path) -> Result<Dimensions> {
    let dims = codec.probe(path)?;
    if dims.width == 0 || dims.height == 0 {
        return Err(PixmeanError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }
    Ok(dims)
}
