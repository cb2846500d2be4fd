//! Local filesystem adapter using std::fs.
//!
//! Writes go through a temporary file in the destination directory that is
//! renamed over the target once fully written. New files get the mode
//! `std::fs::write` would give them (0o666 less the umask); a replaced file
//! keeps its mode.

use std::fs::Permissions;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::trace;

use entigen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{EntigenError, EntigenResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> EntigenResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let existing = std::fs::metadata(path).ok().map(|m| m.permissions());

        let mut builder = Builder::new();
        if let Some(mode) = new_file_permissions() {
            builder.permissions(mode);
        }
        let mut temp = builder
            .tempfile_in(dir)
            .map_err(|e| map_io_error(path, e, "create temporary file"))?;
        if let Some(mode) = existing {
            temp.as_file()
                .set_permissions(mode)
                .map_err(|e| map_io_error(path, e, "copy file permissions"))?;
        }
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| map_io_error(path, e, "write file"))?;
        temp.persist(path)
            .map_err(|e| map_io_error(path, e.error, "replace file"))?;

        trace!(path = %path.display(), "File replaced");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> EntigenResult<String> {
        std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into(),
            _ => map_io_error(path, e, "read file"),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Requested mode for new files; `open(2)` applies the umask to it.
#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> EntigenError {
    ApplicationError::IoError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
