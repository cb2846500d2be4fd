//! Application layer for entigen.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (extraction, rendering, generation)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All metadata rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    DEFAULT_OUTPUT_EXTENSION, ExtractionService, FailurePolicy, GenerationOptions,
    GenerationReport, GenerationService, ItemFailure, ItemKind, OutputCategory, OutputWriter,
    RenderService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    Filesystem, LoadedTemplate, SourceParser, TemplateEngine, TemplateKind, TemplateSource,
};

pub use error::{ApplicationError, SourceLocation};
