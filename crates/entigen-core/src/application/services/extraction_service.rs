//! Extraction Service - source descriptor to metadata entity.
//!
//! Every descriptor variant ends in a [`TypeShape`], which is converted to an
//! [`Entity`] the same way regardless of where it came from.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, SourceParser},
    },
    domain::{Entity, SourceDescriptor, TypeShape},
    error::EntigenResult,
};

/// Builds metadata entities from source descriptors.
pub struct ExtractionService {
    filesystem: Box<dyn Filesystem>,
    parser: Box<dyn SourceParser>,
}

impl ExtractionService {
    pub fn new(filesystem: Box<dyn Filesystem>, parser: Box<dyn SourceParser>) -> Self {
        Self { filesystem, parser }
    }

    /// Extract one entity.
    ///
    /// Fails with `FileNotFound`, `ParseError`, `NoTypeDeclaration`, or
    /// `DuplicatePropertyName`. Never writes anything.
    #[instrument(skip_all, fields(origin = %source.origin()))]
    pub fn extract(&self, source: &SourceDescriptor) -> EntigenResult<Entity> {
        let shape = self.shape_of(source)?;
        debug!(
            name = %shape.name,
            fields = shape.fields.len(),
            "Type shape extracted"
        );

        let entity = Entity::from_shape(shape)?;
        info!(entity = %entity.name, properties = entity.properties.len(), "Entity extracted");
        Ok(entity)
    }

    /// Shorthand for [`Self::extract`] on a file path.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> EntigenResult<Entity> {
        self.extract(&SourceDescriptor::file(path.as_ref()))
    }

    fn shape_of(&self, source: &SourceDescriptor) -> EntigenResult<TypeShape> {
        match source {
            SourceDescriptor::Loaded(shape) => Ok(shape.clone()),
            SourceDescriptor::File(path) => {
                if !self.filesystem.exists(path) {
                    return Err(ApplicationError::FileNotFound { path: path.clone() }.into());
                }
                let text = self.filesystem.read_to_string(path)?;
                self.parser.parse(&path.display().to_string(), &text)
            }
            SourceDescriptor::Text { origin, text } => self.parser.parse(origin, text),
        }
    }
}
