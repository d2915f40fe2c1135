//! Swath file enumeration and reading.

pub mod reader;
pub mod time;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

pub use reader::{read_swath, Swath};
pub use time::TimeEpoch;

/// Lists the swath files with the given extension, lexicographically ordered.
///
/// An empty result is a normal terminal condition for the caller, not an
/// error here.
pub fn list_swath_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().map_or(false, |ext| ext == extension))
        .collect();

    files.sort();

    Ok(files)
}

// -- Tests -------------------------------------------------------------------
