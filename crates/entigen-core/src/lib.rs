//! Entigen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for entigen, a
//! metadata-driven source generator: entity and enum definitions go in,
//! rendered source files come out.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           entigen-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (Extraction, Render, Generation, Output)│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, SourceParser, Templates)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    entigen-adapters (Infrastructure)    │
//! │  (LocalFilesystem, SynSourceParser,     │
//! │   TeraEngine, DirectoryTemplates)       │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Entity, EnumDefinition, TypeRef)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use entigen_core::prelude::*;
//!
//! # fn adapters() -> (Box<dyn TemplateSource>, Box<dyn TemplateEngine>, Box<dyn Filesystem>) { unimplemented!() }
//! let (templates, engine, filesystem) = adapters();
//!
//! let status = EnumDefinition::new("Status").with_value(EnumValue::new("Open", 0));
//! let order = Entity::new("Order")
//!     .with_property(EntityProperty::new("id", "u64").key().required())
//!     .with_property(EntityProperty::new("status", "Status").referencing(status.id));
//!
//! let service = GenerationService::new(
//!     RenderService::new(templates, engine),
//!     OutputWriter::new(filesystem),
//! );
//! let report = service.generate(&[order], &[status], Path::new("./generated"));
//! assert!(report.is_success());
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ExtractionService, FailurePolicy, GenerationOptions, GenerationReport, GenerationService,
        ItemFailure, ItemKind, OutputCategory, OutputWriter, RenderService,
        ports::{Filesystem, SourceParser, TemplateEngine, TemplateKind, TemplateSource},
    };
    pub use crate::domain::{
        Describe, Entity, EntityProperty, EnumDefinition, EnumId, EnumValue, FieldShape,
        RenderContext, SourceDescriptor, TypeName, TypeRef, TypeShape,
    };
    pub use crate::error::{EntigenError, EntigenResult, ErrorKind};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
