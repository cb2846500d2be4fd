use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::entity::{resolve_namespace, validate_file_stem},
    error::DomainError,
};

/// Identity of an [`EnumDefinition`].
///
/// Properties refer to enums by identity, not by name: two definitions
/// sharing a name are still different enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumId(Uuid);

impl EnumId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EnumId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EnumId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for EnumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named integer-valued enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDefinition {
    #[serde(default)]
    pub id: EnumId,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

impl EnumDefinition {
    /// New definition with a fresh identity.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(EnumId::new(), name)
    }

    pub fn with_id(id: EnumId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            namespace: None,
            description: None,
            values: Vec::new(),
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

    pub fn with_value(mut self, value: EnumValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn resolved_namespace(&self) -> &str {
        resolve_namespace(self.namespace.as_deref())
    }

    /// Values are not required to be unique or contiguous.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_file_stem("enum", &self.name)?;

        if let Some(value) = self.values.iter().find(|v| v.name.trim().is_empty()) {
            return Err(DomainError::InvalidMetadata(format!(
                "enum '{}' has a value ({}) with an empty name",
                self.name, value.value
            )));
        }
        Ok(())
    }
}

/// One named member of an [`EnumDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i32,
    #[serde(default)]
    pub description: Option<String>,
}

impl EnumValue {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
