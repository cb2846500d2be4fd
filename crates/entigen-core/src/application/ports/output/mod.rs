//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `entigen-adapters` crate provides implementations.

use std::fmt;
use std::path::Path;

use crate::domain::{RenderContext, TypeShape};
use crate::error::EntigenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `entigen_adapters::filesystem::LocalFilesystem` (production)
/// - `entigen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// No locking is performed: concurrent writers to the same path race and
/// the last one wins.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Succeeds if it exists.
    fn create_dir_all(&self, path: &Path) -> EntigenResult<()>;

    /// Replace the file at `path` with `content`.
    ///
    /// Either the whole content lands or the previous state is kept; a
    /// failed call never leaves a truncated file behind.
    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> EntigenResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for turning source text into a type shape.
///
/// Implemented by:
/// - `entigen_adapters::source_parser::SynSourceParser`
///
/// Purely syntactic: never fails because a referenced type is unknown.
pub trait SourceParser: Send + Sync {
    /// Parse `text` and describe its first type declaration.
    ///
    /// `origin` names the text in diagnostics (usually a path).
    fn parse(&self, origin: &str, text: &str) -> EntigenResult<TypeShape>;
}

/// Which of the two templates to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Entity,
    Enum,
}

impl TemplateKind {
    /// File stem under the template directory (`Entity.<ext>`, `Enum.<ext>`).
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Entity => "Entity",
            Self::Enum => "Enum",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Raw template text plus the name it is registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTemplate {
    pub name: String,
    pub content: String,
}

/// Port for template asset lookup.
///
/// Implemented by:
/// - `entigen_adapters::template_source::DirectoryTemplates` (caller-supplied directory)
/// - `entigen_adapters::template_source::BuiltinTemplates` (shipped defaults)
/// - `entigen_adapters::template_source::MemoryTemplates` (testing)
pub trait TemplateSource: Send + Sync {
    /// Load the template for `kind`; missing assets are `TemplateNotFound`.
    fn load(&self, kind: TemplateKind) -> EntigenResult<LoadedTemplate>;
}

/// Port for the external template engine.
///
/// Implemented by:
/// - `entigen_adapters::template_engine::TeraEngine`
///
/// The engine's expression language is opaque to the core; it only sees a
/// [`RenderContext`].
pub trait TemplateEngine: Send + Sync {
    /// Render `source` (registered as `name`) against `context`.
    fn render(&self, name: &str, source: &str, context: &RenderContext) -> EntigenResult<String>;
}
