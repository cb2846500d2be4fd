use crate::domain::{
    entities::{EnumDefinition, Entity},
    error::DomainError,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_entity(entity: &Entity) -> Result<(), DomainError> {
        entity.validate()
    }

    pub fn validate_enum(enum_def: &EnumDefinition) -> Result<(), DomainError> {
        enum_def.validate()
    }
}
