//! Output Writer - rendered text to files.
//!
//! Layout: `<output_dir>/<category>/<logical_name>.<extension>`.
//! Regeneration overwrites unconditionally; generated files are not meant
//! to be edited by hand.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    error::EntigenResult,
};

/// Conventional source extension of generated files.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "rs";

/// Subdirectory a generated file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputCategory {
    Entities,
    Enums,
}

impl OutputCategory {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Entities => "Entities",
            Self::Enums => "Enums",
        }
    }
}

impl fmt::Display for OutputCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Writes generated files through the filesystem port.
pub struct OutputWriter {
    filesystem: Box<dyn Filesystem>,
    extension: String,
}

impl OutputWriter {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self::with_extension(filesystem, DEFAULT_OUTPUT_EXTENSION)
    }

    /// `extension` is given without the leading dot; empty means none.
    pub fn with_extension(filesystem: Box<dyn Filesystem>, extension: impl Into<String>) -> Self {
        let extension = extension.into().trim_start_matches('.').to_string();
        Self {
            filesystem,
            extension,
        }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path a logical name would be written to, without touching disk.
    pub fn target_path(
        &self,
        output_dir: &Path,
        category: OutputCategory,
        logical_name: &str,
    ) -> PathBuf {
        let file_name = if self.extension.is_empty() {
            logical_name.to_string()
        } else {
            format!("{}.{}", logical_name, self.extension)
        };
        output_dir.join(category.dir_name()).join(file_name)
    }

    /// Ensure the category directory exists and replace the file.
    ///
    /// Idempotent on the directory; last write wins on the file.
    #[instrument(skip(self, output_dir, content), fields(output_dir = %output_dir.display()))]
    pub fn write(
        &self,
        output_dir: &Path,
        category: OutputCategory,
        logical_name: &str,
        content: &str,
    ) -> EntigenResult<PathBuf> {
        let path = self.target_path(output_dir, category, logical_name);

        if logical_name.is_empty() || logical_name.contains(['/', '\\']) || logical_name == ".." {
            return Err(ApplicationError::IoError {
                path,
                reason: format!("'{logical_name}' is not a valid file name"),
            }
            .into());
        }

        self.filesystem
            .create_dir_all(&output_dir.join(category.dir_name()))?;
        self.filesystem.write_file(&path, content)?;

        debug!(path = %path.display(), bytes = content.len(), "File written");
        Ok(path)
    }
}
