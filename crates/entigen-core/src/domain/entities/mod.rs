pub mod catalog;
pub mod entity;
pub mod enum_definition;
pub mod render_context;
pub mod shape;

pub use crate::domain::DomainError;
pub use catalog::{EnumCatalog, enum_closure};
pub use entity::{DEFAULT_NAMESPACE, Entity, EntityProperty};
pub use enum_definition::{EnumDefinition, EnumId, EnumValue};
pub use render_context::RenderContext;
pub use shape::{Describe, FieldShape, SourceDescriptor, TypeShape};
