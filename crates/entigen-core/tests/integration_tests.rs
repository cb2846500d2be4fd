//! Integration tests for entigen-core, driven only through the public API.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use entigen_core::{
    application::{ApplicationError, LoadedTemplate},
    prelude::*,
};

#[derive(Clone, Default)]
struct MapFs(Arc<Mutex<HashMap<PathBuf, String>>>);

impl Filesystem for MapFs {
    fn create_dir_all(&self, _path: &Path) -> EntigenResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
        self.0
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.into());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> EntigenResult<String> {
        self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().contains_key(path)
    }
}

/// Parser that refuses to be called; loaded descriptors must not reach it.
struct NoParser;

impl SourceParser for NoParser {
    fn parse(&self, origin: &str, _text: &str) -> EntigenResult<TypeShape> {
        panic!("parser called for {origin}");
    }
}

/// Renders `<template>:<name>:<property names>`.
struct ListingEngine;

impl TemplateEngine for ListingEngine {
    fn render(&self, name: &str, _source: &str, context: &RenderContext) -> EntigenResult<String> {
        let value = context
            .get("entity")
            .or_else(|| context.get("enum"))
            .cloned()
            .unwrap_or_default();
        let members: Vec<&str> = value["properties"]
            .as_array()
            .or_else(|| value["values"].as_array())
            .map(|items| items.iter().filter_map(|i| i["name"].as_str()).collect())
            .unwrap_or_default();
        Ok(format!(
            "{name}:{}:{}",
            value["name"].as_str().unwrap_or_default(),
            members.join(",")
        ))
    }
}

struct EmptyTemplates;

impl TemplateSource for EmptyTemplates {
    fn load(&self, kind: TemplateKind) -> EntigenResult<LoadedTemplate> {
        Ok(LoadedTemplate {
            name: kind.to_string(),
            content: String::new(),
        })
    }
}

struct Invoice;

impl Describe for Invoice {
    fn shape() -> TypeShape {
        TypeShape::new("Invoice")
            .described("A bill sent to a customer")
            .field(FieldShape::of::<u64>("id").key())
            .field(FieldShape::of::<Option<String>>("memo"))
            .field(FieldShape::of::<HashMap<String, Vec<i64>>>("lines"))
    }
}

#[test]
fn loaded_type_extracts_without_parsing() {
    let service = ExtractionService::new(Box::new(MapFs::default()), Box::new(NoParser));

    let entity = service.extract(&SourceDescriptor::of::<Invoice>()).unwrap();

    assert_eq!(entity.name, "Invoice");
    assert_eq!(entity.description.as_deref(), Some("A bill sent to a customer"));
    let summary: Vec<_> = entity
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.type_name.as_str(), p.is_required, p.is_key))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("id", "u64", true, true),
            ("memo", "Option<String>", false, false),
            ("lines", "HashMap<String,Vec<i64>>", true, false),
        ]
    );
}

#[test]
fn missing_file_is_reported_before_parsing() {
    let service = ExtractionService::new(Box::new(MapFs::default()), Box::new(NoParser));

    let err = service.extract_file("nowhere/Order.rs").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn extracted_entity_generates_with_its_enum() {
    let fs = MapFs::default();
    let extraction = ExtractionService::new(Box::new(fs.clone()), Box::new(NoParser));
    let mut invoice = extraction
        .extract(&SourceDescriptor::of::<Invoice>())
        .unwrap()
        .with_namespace("billing");

    let state = EnumDefinition::new("InvoiceState")
        .with_value(EnumValue::new("Draft", 0))
        .with_value(EnumValue::new("Paid", 1));
    invoice
        .properties
        .push(EntityProperty::new("state", "InvoiceState").referencing(state.id));

    let service = GenerationService::new(
        RenderService::new(Box::new(EmptyTemplates), Box::new(ListingEngine)),
        OutputWriter::new(Box::new(fs.clone())),
    );
    let paths = service
        .generate_entity(&invoice, &[state], Path::new("out"))
        .into_result()
        .unwrap();

    assert_eq!(
        paths,
        vec![
            PathBuf::from("out/Enums/InvoiceState.rs"),
            PathBuf::from("out/Entities/Invoice.rs"),
        ]
    );
    assert_eq!(
        fs.read_to_string(Path::new("out/Entities/Invoice.rs")).unwrap(),
        "Entity:Invoice:id,memo,lines,state"
    );
    assert_eq!(
        fs.read_to_string(Path::new("out/Enums/InvoiceState.rs")).unwrap(),
        "Enum:InvoiceState:Draft,Paid"
    );
}
