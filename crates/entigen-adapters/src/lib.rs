//! Infrastructure adapters for entigen.
//!
//! This crate implements the ports defined in `entigen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod discovery;
pub mod filesystem;
pub mod metadata_loader;
pub mod source_parser;
pub mod template_engine;
pub mod template_source;

// Re-export commonly used adapters
pub use discovery::{DEFAULT_SOURCE_EXTENSION, discover_sources};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use metadata_loader::{MetadataBatch, MetadataFormat, MetadataLoader};
pub use source_parser::SynSourceParser;
pub use template_engine::TeraEngine;
pub use template_source::{
    BuiltinTemplates, DEFAULT_TEMPLATE_EXTENSION, DirectoryTemplates, MemoryTemplates,
};
