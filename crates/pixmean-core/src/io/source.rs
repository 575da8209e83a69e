use std::path::{Path, PathBuf};

use crate::error::{PixmeanError, Result};

/// List the regular files directly inside `dir`, sorted by path.
///
/// Subdirectories are not descended into and extensions are not checked;
/// non-image files are weeded out later when they fail to decode.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let enumeration_error = |source| PixmeanError::Enumeration {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(enumeration_error)? {
        let path = entry.map_err(enumeration_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
