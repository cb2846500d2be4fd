//! Unified error handling for entigen core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for entigen core operations.
///
/// This enum wraps all possible errors that can occur when using entigen-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntigenError {
    /// Errors from the domain layer (metadata rule violations).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (files, parsing, templates).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl EntigenError {
    /// The error kind, independent of which layer raised it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => match e {
                DomainError::InvalidMetadata(_) => ErrorKind::InvalidMetadata,
                DomainError::DuplicatePropertyName { .. } => ErrorKind::DuplicatePropertyName,
                DomainError::UnresolvedEnumReference { .. } => ErrorKind::UnresolvedEnumReference,
            },
            Self::Application(e) => match e {
                ApplicationError::FileNotFound { .. } => ErrorKind::FileNotFound,
                ApplicationError::ParseError { .. } => ErrorKind::ParseError,
                ApplicationError::NoTypeDeclaration { .. } => ErrorKind::NoTypeDeclaration,
                ApplicationError::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
                ApplicationError::RenderError { .. } => ErrorKind::RenderError,
                ApplicationError::IoError { .. } | ApplicationError::AdapterUnavailable { .. } => {
                    ErrorKind::IoError
                }
            },
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in entigen".into(),
                "Please report this issue at: https://github.com/cosecruz/entigen/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Flat classification of every failure the core can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    ParseError,
    NoTypeDeclaration,
    UnresolvedEnumReference,
    TemplateNotFound,
    RenderError,
    IoError,
    DuplicatePropertyName,
    InvalidMetadata,
    Internal,
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type EntigenResult<T> = Result<T, EntigenError>;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn kind_flattens_layers() {
        let err: EntigenError = ApplicationError::FileNotFound {
            path: PathBuf::from("missing.rs"),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.category(), ErrorCategory::NotFound);

        let err: EntigenError = DomainError::DuplicatePropertyName {
            entity: "A".into(),
            property: "b".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::DuplicatePropertyName);
        assert_eq!(err.category(), ErrorCategory::Validation);

        let err: EntigenError = DomainError::UnresolvedEnumReference {
            entity: "Order".into(),
            property: "status".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::UnresolvedEnumReference);
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn every_error_has_suggestions() {
        let errors: Vec<EntigenError> = vec![
            DomainError::InvalidMetadata("x".into()).into(),
            ApplicationError::NoTypeDeclaration { origin: "a.rs".into() }.into(),
            ApplicationError::RenderError {
                template: "Entity".into(),
                reason: "boom".into(),
            }
            .into(),
            EntigenError::Internal { message: "x".into() },
        ];

        for err in errors {
            assert!(!err.suggestions().is_empty(), "{err}");
        }
    }
}
