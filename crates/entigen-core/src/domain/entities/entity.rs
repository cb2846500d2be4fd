use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{enum_definition::EnumId, shape::TypeShape},
    error::DomainError,
};

/// Namespace used when an entity or enum does not declare one.
pub const DEFAULT_NAMESPACE: &str = "generated";

/// A named record type with an ordered set of typed properties.
///
/// Properties are owned exclusively by the entity; their order is the
/// declaration order and drives member order in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<EntityProperty>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            description: None,
            properties: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_property(mut self, property: EntityProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Namespace to render with: the declared one if non-blank, else
    /// [`DEFAULT_NAMESPACE`].
    pub fn resolved_namespace(&self) -> &str {
        resolve_namespace(self.namespace.as_deref())
    }

    /// Enum identities referenced by this entity, in property order.
    /// May contain repeats.
    pub fn enum_refs(&self) -> impl Iterator<Item = EnumId> + '_ {
        self.properties.iter().filter_map(|p| p.enum_ref)
    }

    /// Build an entity from an extracted type shape.
    ///
    /// Duplicate member names are reported, never merged.
    pub fn from_shape(shape: TypeShape) -> Result<Self, DomainError> {
        let description = Some(shape.description).filter(|d| !d.is_empty());

        let entity = Self {
            name: shape.name,
            namespace: None,
            description,
            properties: shape
                .fields
                .into_iter()
                .map(|field| EntityProperty {
                    type_name: field.type_ref.to_string(),
                    is_required: field.is_required,
                    is_key: field.is_key,
                    description: field.description,
                    name: field.name,
                    enum_ref: None,
                })
                .collect(),
        };

        entity.check_unique_properties()?;
        Ok(entity)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_file_stem("entity", &self.name)?;

        for property in &self.properties {
            if property.name.trim().is_empty() {
                return Err(DomainError::InvalidMetadata(format!(
                    "entity '{}' has a property with an empty name",
                    self.name
                )));
            }
            if property.type_name.trim().is_empty() {
                return Err(DomainError::InvalidMetadata(format!(
                    "property '{}.{}' has no type",
                    self.name, property.name
                )));
            }
        }

        self.check_unique_properties()
    }

    fn check_unique_properties(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                return Err(DomainError::DuplicatePropertyName {
                    entity: self.name.clone(),
                    property: property.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One typed member of an [`Entity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProperty {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_key: bool,
    #[serde(default)]
    pub description: String,
    /// Non-owning reference to an enum definition of the same batch.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_ref: Option<EnumId>,
}

impl EntityProperty {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_required: false,
            is_key: false,
            description: String::new(),
            enum_ref: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn referencing(mut self, enum_id: EnumId) -> Self {
        self.enum_ref = Some(enum_id);
        self
    }
}

pub(crate) fn resolve_namespace(namespace: Option<&str>) -> &str {
    match namespace.map(str::trim) {
        Some(ns) if !ns.is_empty() => ns,
        _ => DEFAULT_NAMESPACE,
    }
}

/// Names become file stems, so they must not escape the output directory.
pub(crate) fn validate_file_stem(what: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidMetadata(format!("{what} name is empty")));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(DomainError::InvalidMetadata(format!(
            "{what} name '{name}' cannot be used as a file name"
        )));
    }
    Ok(())
}
