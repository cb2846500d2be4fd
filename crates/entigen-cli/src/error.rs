//! Error handling for the entigen CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use entigen_core::application::ItemFailure;
use entigen_core::error::{EntigenError, ErrorCategory as CoreCategory};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// `--entity` named something the metadata does not define.
    #[error("Entity '{name}' is not defined in the metadata")]
    EntityNotFound { name: String, available: Vec<String> },

    /// A scaffold directory held no source files.
    #[error("No source files found under {}", path.display())]
    NoSources { path: PathBuf },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `entigen-core` or an adapter.
    #[error("{0}")]
    Core(#[from] EntigenError),

    /// A batch finished with failed items; produced files were written.
    #[error("Generation finished with {} failed item(s)", failures.len())]
    GenerationFailed { failures: Vec<ItemFailure> },

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::EntityNotFound { name, available } => {
                let mut suggestions = vec![format!("No entity named '{name}' in this batch")];
                if available.is_empty() {
                    suggestions.push("The metadata defines no entities".into());
                } else {
                    suggestions.push("Defined entities:".into());
                    for entity in available {
                        suggestions.push(format!("  • {entity}"));
                    }
                }
                suggestions
            }

            Self::NoSources { path } => vec![
                format!("'{}' contains no .rs files", path.display()),
                "Pass a single source file or a directory of Rust sources".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Run 'entigen config path' to see which file is read".into(),
                "Use 'entigen init --force' to write a fresh default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::GenerationFailed { failures } => {
                let mut suggestions = failures
                    .first()
                    .map(|f| f.error.suggestions())
                    .unwrap_or_default();
                suggestions.push(
                    "Use --policy continue-collect-errors to generate the remaining items".into(),
                );
                suggestions
            }

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::EntityNotFound { .. } | Self::NoSources { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => core_category(core),
            Self::GenerationFailed { failures } => failures
                .first()
                .map_or(ErrorCategory::Internal, |f| core_category(&f.error)),
            Self::IoError { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "\u{2192}".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

fn core_category(err: &EntigenError) -> ErrorCategory {
    match err.category() {
        CoreCategory::Validation => ErrorCategory::UserError,
        CoreCategory::NotFound => ErrorCategory::NotFound,
        CoreCategory::Configuration => ErrorCategory::Configuration,
        CoreCategory::Internal => ErrorCategory::Internal,
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (bad arguments, metadata, or source).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal or system error.
    Internal,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use entigen_core::application::{ApplicationError, ItemKind, SourceLocation};
    use entigen_core::domain::DomainError;

    use super::*;

    fn failure(error: EntigenError) -> ItemFailure {
        ItemFailure {
            kind: ItemKind::Entity,
            index: 0,
            name: "Order".into(),
            error,
        }
    }

    #[test]
    fn exit_codes_follow_categories() {
        let missing: CliError = EntigenError::from(ApplicationError::FileNotFound {
            path: PathBuf::from("a.rs"),
        })
        .into();
        let parse: CliError = EntigenError::from(ApplicationError::ParseError {
            origin: "a.rs".into(),
            location: SourceLocation::new(1, 1),
            message: "bad".into(),
        })
        .into();
        let io: CliError = std::io::Error::other("disk").into();

        assert_eq!(missing.exit_code(), 3);
        assert_eq!(parse.exit_code(), 2);
        assert_eq!(io.exit_code(), 1);
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn generation_failure_uses_first_failure_category() {
        let err = CliError::GenerationFailed {
            failures: vec![
                failure(
                    DomainError::UnresolvedEnumReference {
                        entity: "Order".into(),
                        property: "status".into(),
                    }
                    .into(),
                ),
                failure(EntigenError::Internal { message: "x".into() }),
            ],
        };

        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("2 failed"));
        assert!(err.suggestions()[0].contains("Order.status"));
    }

    #[test]
    fn entity_not_found_lists_available_entities() {
        let err = CliError::EntityNotFound {
            name: "Ghost".into(),
            available: vec!["Order".into(), "Customer".into()],
        };

        assert_eq!(err.exit_code(), 3);
        assert!(err.suggestions().iter().any(|s| s.contains("Customer")));
    }

    #[test]
    fn plain_format_has_no_ansi() {
        let err = CliError::InvalidInput {
            message: "nope".into(),
        };
        let text = err.format_plain(false);

        assert!(text.contains("Error: Invalid input: nope"));
        assert!(text.contains("Suggestions:"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn verbose_plain_format_prints_the_cause_chain() {
        let err = CliError::ConfigError {
            message: "unreadable".into(),
            source: Some(Box::new(std::io::Error::other("permission denied"))),
        };

        assert!(err.format_plain(true).contains("Caused by: permission denied"));
    }
}
