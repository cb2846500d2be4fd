//! Template sources: where `Entity` and `Enum` templates come from.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── Entity.tera   ← rendered once per entity
//! └── Enum.tera     ← rendered once per enum
//! ```
//!
//! When no directory is configured, [`BuiltinTemplates`] supplies templates
//! that emit plain Rust structs, and enums as `i32` newtypes with one
//! associated constant per value (values may repeat).

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use entigen_core::{
    application::{
        ApplicationError,
        ports::{LoadedTemplate, TemplateKind, TemplateSource},
    },
    error::EntigenResult,
};

/// Extension of template files inside a template directory.
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "tera";

const BUILTIN_ENTITY: &str = include_str!("../templates/Entity.tera");
const BUILTIN_ENUM: &str = include_str!("../templates/Enum.tera");

// ── Directory ────────────────────────────────────────────────────────────────

/// Templates read from `<dir>/<Kind>.<extension>` on every load.
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    dir: PathBuf,
    extension: String,
}

impl DirectoryTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_extension(dir, DEFAULT_TEMPLATE_EXTENSION)
    }

    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the template for `kind` is expected at.
    pub fn path_for(&self, kind: TemplateKind) -> PathBuf {
        if self.extension.is_empty() {
            self.dir.join(kind.file_stem())
        } else {
            self.dir
                .join(format!("{}.{}", kind.file_stem(), self.extension))
        }
    }
}

impl TemplateSource for DirectoryTemplates {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self, kind: TemplateKind) -> EntigenResult<LoadedTemplate> {
        let path = self.path_for(kind);

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::TemplateNotFound {
                name: kind.to_string(),
                path: path.clone(),
            },
            _ => ApplicationError::IoError {
                path: path.clone(),
                reason: format!("Failed to read template: {e}"),
            },
        })?;

        debug!(path = %path.display(), bytes = content.len(), "Template loaded");
        Ok(LoadedTemplate {
            name: kind.to_string(),
            content,
        })
    }
}

// ── Built-in ─────────────────────────────────────────────────────────────────

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl BuiltinTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Raw text of the built-in template for `kind`.
    pub fn content(kind: TemplateKind) -> &'static str {
        match kind {
            TemplateKind::Entity => BUILTIN_ENTITY,
            TemplateKind::Enum => BUILTIN_ENUM,
        }
    }
}

impl TemplateSource for BuiltinTemplates {
    fn load(&self, kind: TemplateKind) -> EntigenResult<LoadedTemplate> {
        Ok(LoadedTemplate {
            name: kind.to_string(),
            content: Self::content(kind).to_string(),
        })
    }
}

// ── In-memory ────────────────────────────────────────────────────────────────

/// Templates held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplates {
    templates: HashMap<TemplateKind, String>,
}

impl MemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: TemplateKind, content: impl Into<String>) -> Self {
        self.templates.insert(kind, content.into());
        self
    }
}

impl TemplateSource for MemoryTemplates {
    fn load(&self, kind: TemplateKind) -> EntigenResult<LoadedTemplate> {
        let content = self.templates.get(&kind).ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                name: kind.to_string(),
                path: PathBuf::from(format!("<memory>/{}", kind.file_stem())),
            }
        })?;

        Ok(LoadedTemplate {
            name: kind.to_string(),
            content: content.clone(),
        })
    }
}
