pub mod extract;
pub mod features;
pub mod fetch;
pub mod merge;

use std::path::{Path, PathBuf};

pub use extract::extract;
pub use features::features;
pub use fetch::fetch;
pub use merge::merge;

/// Maps a swath file name to its extract name, `<stem>.csv.gz`.
pub fn make_output_file_name(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "extract".to_string(), |s| s.to_string_lossy().to_string());

    PathBuf::from(format!("{}.csv.gz", stem))
}

/// The file name alone, for status lines.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string())
}

// -- Tests -------------------------------------------------------------------
