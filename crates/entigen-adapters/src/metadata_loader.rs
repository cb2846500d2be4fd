//! Metadata batch loader.
//!
//! Reads a document of enum and entity definitions and turns it into model
//! objects ready for the generation service.
//!
//! # Format (TOML shown; JSON mirrors it)
//!
//! ```toml
//! [[enums]]
//! name = "OrderStatus"
//! namespace = "shop"
//! values = [{ name = "Pending", value = 0 }, { name = "Paid", value = 1 }]
//!
//! [[entities]]
//! name = "Order"
//! namespace = "shop"
//!
//! [[entities.properties]]
//! name = "status"
//! type = "OrderStatus"
//! required = true
//! enum = "OrderStatus"   # by name, within this document
//! ```
//!
//! Enum references are names inside the document and become identities on
//! load. A name that no enum in the document carries still becomes an
//! identity, just one that nothing in the batch has; generation reports it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use entigen_core::{
    application::{ApplicationError, SourceLocation, ports::Filesystem},
    domain::{EnumDefinition, EnumId, EnumValue, Entity, EntityProperty},
    error::{EntigenError, EntigenResult},
};

// ── Document types ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct MetadataDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    enums: Vec<EnumEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<EntityEntry>,
}

/// One entry under `[[enums]]`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct EnumEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    values: Vec<ValueEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ValueEntry {
    name: String,
    value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

/// One entry under `[[entities]]`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct EntityEntry {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    properties: Vec<PropertyEntry>,
}

/// One entry under `[[entities.properties]]`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct PropertyEntry {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    key: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
    /// Enum referenced by name.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_name: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ── Batch ─────────────────────────────────────────────────────────────────────

/// A loaded generation batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataBatch {
    pub enums: Vec<EnumDefinition>,
    pub entities: Vec<Entity>,
}

impl MetadataBatch {
    pub fn find_entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.entities.is_empty()
    }
}

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Toml,
    Json,
}

impl MetadataFormat {
    /// `.json` is JSON; everything else is read as TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`MetadataBatch`]es through the filesystem port.
pub struct MetadataLoader {
    filesystem: Box<dyn Filesystem>,
}

impl MetadataLoader {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Load the document at `path`.
    ///
    /// # Errors
    ///
    /// `FileNotFound` if nothing is at `path`; `ParseError` (with line and
    /// column) if the document is malformed or has unknown keys.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> EntigenResult<MetadataBatch> {
        if !self.filesystem.exists(path) {
            return Err(ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let text = self.filesystem.read_to_string(path)?;
        parse(&path.display().to_string(), &text, MetadataFormat::from_path(path))
    }
}

/// Parse a metadata document held in memory.
pub fn parse(origin: &str, text: &str, format: MetadataFormat) -> EntigenResult<MetadataBatch> {
    let document: MetadataDocument = match format {
        MetadataFormat::Toml => toml::from_str(text).map_err(|e| {
            let offset = e.span().map_or(0, |span| span.start);
            ApplicationError::ParseError {
                origin: origin.to_string(),
                location: SourceLocation::from_offset(text, offset),
                message: e.message().to_string(),
            }
        })?,
        MetadataFormat::Json => serde_json::from_str(text).map_err(|e| {
            ApplicationError::ParseError {
                origin: origin.to_string(),
                location: SourceLocation::new(e.line().max(1), e.column().max(1)),
                message: e.to_string(),
            }
        })?,
    };

    let batch = build_batch(document);
    debug!(
        enums = batch.enums.len(),
        entities = batch.entities.len(),
        "Metadata loaded"
    );
    Ok(batch)
}

/// Write a batch back out as a metadata document.
///
/// Enum identities become names again. A reference to an enum outside the
/// batch has no name to write and is dropped with a warning.
pub fn serialize(batch: &MetadataBatch, format: MetadataFormat) -> EntigenResult<String> {
    let document = to_document(batch);
    let text = match format {
        MetadataFormat::Toml => toml::to_string_pretty(&document).map_err(|e| e.to_string()),
        MetadataFormat::Json => serde_json::to_string_pretty(&document).map_err(|e| e.to_string()),
    };
    text.map_err(|message| EntigenError::Internal {
        message: format!("Failed to serialise metadata: {message}"),
    })
}

fn to_document(batch: &MetadataBatch) -> MetadataDocument {
    let names: HashMap<EnumId, &str> = batch
        .enums
        .iter()
        .map(|e| (e.id, e.name.as_str()))
        .collect();

    MetadataDocument {
        enums: batch
            .enums
            .iter()
            .map(|e| EnumEntry {
                name: e.name.clone(),
                namespace: e.namespace.clone(),
                description: e.description.clone(),
                values: e
                    .values
                    .iter()
                    .map(|v| ValueEntry {
                        name: v.name.clone(),
                        value: v.value,
                        description: v.description.clone(),
                    })
                    .collect(),
            })
            .collect(),
        entities: batch
            .entities
            .iter()
            .map(|entity| EntityEntry {
                name: entity.name.clone(),
                namespace: entity.namespace.clone(),
                description: entity.description.clone(),
                properties: entity
                    .properties
                    .iter()
                    .map(|p| PropertyEntry {
                        name: p.name.clone(),
                        type_name: p.type_name.clone(),
                        required: p.is_required,
                        key: p.is_key,
                        description: p.description.clone(),
                        enum_name: p.enum_ref.and_then(|id| {
                            let name = names.get(&id).map(|n| n.to_string());
                            if name.is_none() {
                                warn!(
                                    entity = %entity.name,
                                    property = %p.name,
                                    "Enum reference outside the batch dropped"
                                );
                            }
                            name
                        }),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn build_batch(document: MetadataDocument) -> MetadataBatch {
    let enums: Vec<EnumDefinition> = document.enums.into_iter().map(build_enum).collect();

    let mut by_name: HashMap<String, EnumId> = HashMap::new();
    for def in &enums {
        if by_name.contains_key(&def.name) {
            warn!(name = %def.name, "Duplicate enum name; references resolve to the first");
            continue;
        }
        by_name.insert(def.name.clone(), def.id);
    }

    let entities = document
        .entities
        .into_iter()
        .map(|entry| build_entity(entry, &mut by_name))
        .collect();

    MetadataBatch { enums, entities }
}

fn build_enum(entry: EnumEntry) -> EnumDefinition {
    EnumDefinition {
        id: EnumId::new(),
        name: entry.name,
        namespace: entry.namespace,
        description: entry.description,
        values: entry
            .values
            .into_iter()
            .map(|v| EnumValue {
                name: v.name,
                value: v.value,
                description: v.description,
            })
            .collect(),
    }
}

fn build_entity(entry: EntityEntry, by_name: &mut HashMap<String, EnumId>) -> Entity {
    let properties = entry
        .properties
        .into_iter()
        .map(|p| {
            let enum_ref = p.enum_name.map(|enum_name| {
                *by_name.entry(enum_name).or_insert_with_key(|missing| {
                    warn!(
                        entity = %entry.name,
                        property = %p.name,
                        enum_name = %missing,
                        "Enum not defined in this document"
                    );
                    EnumId::new()
                })
            });

            EntityProperty {
                name: p.name,
                type_name: p.type_name,
                is_required: p.required,
                is_key: p.key,
                description: p.description,
                enum_ref,
            }
        })
        .collect();

    Entity {
        name: entry.name,
        namespace: entry.namespace,
        description: entry.description,
        properties,
    }
}

#[cfg(test)]
mod tests {
    use entigen_core::error::{EntigenError, ErrorKind};

    use super::*;
    use crate::filesystem::MemoryFilesystem;

    const SHOP: &str = r#"
[[enums]]
name = "OrderStatus"
namespace = "shop"
values = [{ name = "Pending", value = 0 }, { name = "Paid", value = 1, description = "Settled" }]

[[entities]]
name = "Order"
namespace = "shop"
description = "A placed order"

[[entities.properties]]
name = "id"
type = "u64"
required = true
key = true

[[entities.properties]]
name = "status"
type = "OrderStatus"
enum = "OrderStatus"
"#;

    #[test]
    fn toml_document_resolves_enum_names_to_identities() {
        let batch = parse("shop.toml", SHOP, MetadataFormat::Toml).unwrap();

        assert_eq!(batch.enums.len(), 1);
        let status = &batch.enums[0];
        assert_eq!(status.values[1].description.as_deref(), Some("Settled"));

        let order = batch.find_entity("Order").unwrap();
        assert_eq!(order.description.as_deref(), Some("A placed order"));
        assert!(order.properties[0].is_key && order.properties[0].is_required);
        assert_eq!(order.properties[0].enum_ref, None);
        assert_eq!(order.properties[1].enum_ref, Some(status.id));
    }

    #[test]
    fn json_document_mirrors_toml() {
        let json = r#"{
            "enums": [{ "name": "Color", "values": [{ "name": "Red", "value": 1 }] }],
            "entities": [{
                "name": "Car",
                "properties": [{ "name": "color", "type": "Color", "enum": "Color" }]
            }]
        }"#;

        let batch = parse("cars.json", json, MetadataFormat::Json).unwrap();

        assert_eq!(batch.entities[0].properties[0].enum_ref, Some(batch.enums[0].id));
        assert!(!batch.entities[0].properties[0].is_required);
    }

    #[test]
    fn unknown_enum_name_gets_an_identity_outside_the_batch() {
        let doc = r#"
[[entities]]
name = "A"
[[entities.properties]]
name = "x"
type = "Ghost"
enum = "Ghost"
[[entities.properties]]
name = "y"
type = "Ghost"
enum = "Ghost"
"#;
        let batch = parse("a.toml", doc, MetadataFormat::Toml).unwrap();

        let props = &batch.entities[0].properties;
        let ghost = props[0].enum_ref.unwrap();
        assert_eq!(props[1].enum_ref, Some(ghost));
        assert!(batch.enums.iter().all(|e| e.id != ghost));
    }

    #[test]
    fn syntax_errors_carry_line_and_column() {
        let doc = "[[entities]]\nname = \"A\"\nproperties = [\n";

        let err = parse("bad.toml", doc, MetadataFormat::Toml).unwrap_err();

        match err {
            EntigenError::Application(ApplicationError::ParseError { origin, location, .. }) => {
                assert_eq!(origin, "bad.toml");
                assert!(location.line >= 3, "{location}");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse("x.toml", "[[entities]]\nname = \"A\"\ncolour = 1\n", MetadataFormat::Toml)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn serialized_document_loads_back_with_the_same_links() {
        let batch = parse("shop.toml", SHOP, MetadataFormat::Toml).unwrap();

        for format in [MetadataFormat::Toml, MetadataFormat::Json] {
            let text = serialize(&batch, format).unwrap();
            let again = parse("again", &text, format).unwrap();

            let order = &again.entities[0];
            assert_eq!(order.properties[0].enum_ref, None);
            assert_eq!(order.properties[1].enum_ref, Some(again.enums[0].id));
            assert_eq!(again.enums[0].values, batch.enums[0].values);
            assert_eq!(order.description, batch.entities[0].description);
        }
    }

    #[test]
    fn load_reads_through_filesystem_and_picks_format() {
        let fs = MemoryFilesystem::new()
            .with_file("/meta/shop.toml", SHOP)
            .with_file("/meta/empty.json", "{}");
        let loader = MetadataLoader::new(Box::new(fs));

        assert_eq!(loader.load(Path::new("/meta/shop.toml")).unwrap().entities.len(), 1);
        assert!(loader.load(Path::new("/meta/empty.json")).unwrap().is_empty());
        assert_eq!(
            loader.load(Path::new("/meta/none.toml")).unwrap_err().kind(),
            ErrorKind::FileNotFound
        );
    }
}
