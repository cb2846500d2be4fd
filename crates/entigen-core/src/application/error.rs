//! Application layer errors.
//!
//! These errors represent failures at the edges (files, parsing,
//! templates), not metadata rule violations. Those are `DomainError` from
//! `crate::domain`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Position inside a source document, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Location of a byte offset within `text`.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = text.get(..offset).unwrap_or(text);
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors that occur while talking to the outside world.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A source, metadata, or template file does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Source or metadata text is malformed.
    #[error("Parse error in {origin} at {location}: {message}")]
    ParseError {
        origin: String,
        location: SourceLocation,
        message: String,
    },

    /// Parsed source contains no type declaration to extract.
    #[error("No type declaration found in {origin}")]
    NoTypeDeclaration { origin: String },

    /// Expected template asset is missing.
    #[error("Template '{name}' not found at {path}")]
    TemplateNotFound { name: String, path: PathBuf },

    /// Template engine rejected the template or failed evaluating it.
    #[error("Rendering template '{template}' failed: {reason}")]
    RenderError { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    IoError { path: PathBuf, reason: String },

    /// Shared adapter state is unusable (lock poisoned, etc.).
    #[error("Adapter state unavailable: {name}")]
    AdapterUnavailable { name: &'static str },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileNotFound { path } => vec![
                format!("Nothing exists at: {}", path.display()),
                "Check the path and the current working directory".into(),
            ],
            Self::ParseError { origin, location, .. } => vec![
                format!("Fix the syntax near {}:{}", origin, location),
            ],
            Self::NoTypeDeclaration { origin } => vec![
                format!("'{}' must declare a struct to extract", origin),
                "Example: pub struct Order { pub id: u64 }".into(),
            ],
            Self::TemplateNotFound { path, .. } => vec![
                format!("Create the template at: {}", path.display()),
                "Or drop --templates to use the built-in templates".into(),
            ],
            Self::RenderError { .. } => vec![
                "Check the template for syntax errors and undefined variables".into(),
                "Entity templates see `entity` and `namespace`; enum templates see `enum` and `namespace`".into(),
            ],
            Self::IoError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::AdapterUnavailable { name } => vec![
                format!("Internal component unavailable: {}", name),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FileNotFound { .. } | Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::ParseError { .. } | Self::NoTypeDeclaration { .. } => ErrorCategory::Validation,
            Self::RenderError { .. } => ErrorCategory::Validation,
            Self::IoError { .. } | Self::AdapterUnavailable { .. } => ErrorCategory::Internal,
        }
    }
}
