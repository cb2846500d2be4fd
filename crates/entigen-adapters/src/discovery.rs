//! Source discovery: which files a scaffold run should extract from.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use entigen_core::{application::ApplicationError, error::EntigenResult};

/// Extension of Rust source files.
pub const DEFAULT_SOURCE_EXTENSION: &str = "rs";

/// Files to extract from `path`.
///
/// A file is returned as-is, whatever its extension. A directory yields
/// every file below it whose extension is `extension`, sorted by path so
/// batches are deterministic. Unreadable entries are skipped with a warning.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn discover_sources(path: &Path, extension: &str) -> EntigenResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(ApplicationError::FileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let extension = extension.trim_start_matches('.');
    let mut sources: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect();

    sources.sort();
    debug!(count = sources.len(), "Sources discovered");
    Ok(sources)
}
