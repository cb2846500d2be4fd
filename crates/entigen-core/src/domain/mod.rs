// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for entigen.
//!
//! This module contains the metadata model and the pure rules around it.
//! Parsing, templating, and file output are handled via ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Owned aggregates**: Entities own their properties, enums own their values
//! - **Identity references**: a property points at an enum by [`EnumId`] only
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    DEFAULT_NAMESPACE, Describe, Entity, EntityProperty, EnumCatalog, EnumDefinition, EnumId,
    EnumValue, FieldShape, RenderContext, SourceDescriptor, TypeShape, enum_closure,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{TypeName, TypeRef};

pub use validation::DomainValidator;
