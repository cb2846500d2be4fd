//! The variable context handed to the template engine.
//!
//! The engine only ever sees a name → value mapping. Building that mapping
//! is explicit here, so the engine's own binding rules never leak into the
//! rest of the system.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::{
    entities::{
        catalog::EnumCatalog,
        entity::Entity,
        enum_definition::{EnumDefinition, EnumValue},
    },
    error::DomainError,
};

/// Name → value mapping; values are scalars, mappings, or sequences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    vars: Map<String, Value>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for an entity template: `entity` and `namespace`.
    ///
    /// Each property carries its resolved enum definition under `enum`
    /// (or null). An unresolvable reference fails the whole context.
    pub fn for_entity(entity: &Entity, catalog: &EnumCatalog<'_>) -> Result<Self, DomainError> {
        let resolved = catalog.resolve(entity)?;

        let view = EntityView {
            name: &entity.name,
            namespace: entity.namespace.as_deref(),
            description: entity.description.as_deref(),
            properties: entity
                .properties
                .iter()
                .zip(resolved)
                .map(|(p, enum_def)| PropertyView {
                    name: &p.name,
                    type_name: &p.type_name,
                    is_required: p.is_required,
                    is_key: p.is_key,
                    description: &p.description,
                    enum_def: enum_def.map(EnumView::from),
                })
                .collect(),
        };

        Ok(Self::new()
            .with_value("entity", to_value(&view)?)
            .with_variable("namespace", entity.resolved_namespace()))
    }

    /// Context for an enum template: `enum` and `namespace`.
    pub fn for_enum(enum_def: &EnumDefinition) -> Result<Self, DomainError> {
        Ok(Self::new()
            .with_value("enum", to_value(&EnumView::from(enum_def))?)
            .with_variable("namespace", enum_def.resolved_namespace()))
    }

    pub fn with_variable(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_value(key, Value::String(value.into()))
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.vars.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.vars
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.vars)
    }
}

fn to_value<T: Serialize>(view: &T) -> Result<Value, DomainError> {
    serde_json::to_value(view)
        .map_err(|e| DomainError::InvalidMetadata(format!("cannot build render context: {e}")))
}

// ── Views ─────────────────────────────────────────────────────────────────────
// Borrowed projections of the model; identities are not exposed to templates.

#[derive(Serialize)]
struct EntityView<'a> {
    name: &'a str,
    namespace: Option<&'a str>,
    description: Option<&'a str>,
    properties: Vec<PropertyView<'a>>,
}

#[derive(Serialize)]
struct PropertyView<'a> {
    name: &'a str,
    type_name: &'a str,
    is_required: bool,
    is_key: bool,
    description: &'a str,
    #[serde(rename = "enum")]
    enum_def: Option<EnumView<'a>>,
}

#[derive(Serialize)]
struct EnumView<'a> {
    name: &'a str,
    namespace: Option<&'a str>,
    description: Option<&'a str>,
    values: &'a [EnumValue],
}

impl<'a> From<&'a EnumDefinition> for EnumView<'a> {
    fn from(e: &'a EnumDefinition) -> Self {
        Self {
            name: &e.name,
            namespace: e.namespace.as_deref(),
            description: e.description.as_deref(),
            values: &e.values,
        }
    }
}
