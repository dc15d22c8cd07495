use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PlateError;

/// Lists the image files directly inside `dir`, sorted by path.
/// Extensions are compared case insensitively.
pub fn collect_images(dir: impl AsRef<Path>, extensions: &[String]) -> Result<Vec<PathBuf>, PlateError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
