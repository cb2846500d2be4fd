//! Generation Service - main application orchestrator.
//!
//! This service coordinates a generation batch:
//! 1. Validate each item
//! 2. Render it through the template engine
//! 3. Write it through the output writer
//!
//! Enums are generated before entities; within each group input order is
//! kept. The batch is not transactional: files already written stay written
//! when a later item fails.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::services::{
        output_writer::{OutputCategory, OutputWriter},
        render_service::RenderService,
    },
    domain::{DomainValidator, EnumCatalog, EnumDefinition, Entity, enum_closure},
    error::{EntigenError, EntigenResult},
};

/// What to do after an item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the batch; report the error and the paths written so far.
    #[default]
    StopOnFirstError,
    /// Attempt every item; report all paths plus every per-item error.
    ContinueCollectErrors,
}

impl FailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StopOnFirstError => "stop-on-first-error",
            Self::ContinueCollectErrors => "continue-collect-errors",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop-on-first-error" | "stop" => Ok(Self::StopOnFirstError),
            "continue-collect-errors" | "continue" => Ok(Self::ContinueCollectErrors),
            other => Err(format!(
                "unknown failure policy '{other}' (expected stop-on-first-error or continue-collect-errors)"
            )),
        }
    }
}

/// Batch-level knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    pub policy: FailurePolicy,
    /// Render items on worker threads. Writes stay sequential and ordered.
    pub parallel_render: bool,
}

/// Whether a failed item was an enum or an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Enum,
    Entity,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enum => f.write_str("enum"),
            Self::Entity => f.write_str("entity"),
        }
    }
}

/// One item's failure, attributed by kind, position, and name.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub kind: ItemKind,
    /// 0-based position within its group (enums or entities) of the input.
    pub index: usize,
    pub name: String,
    pub error: EntigenError,
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} '{}': {}", self.kind, self.index, self.name, self.error)
    }
}

/// Outcome of a batch: produced paths in generation order plus failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub paths: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first_failure(&self) -> Option<&ItemFailure> {
        self.failures.first()
    }

    /// Paths on full success, otherwise every failure.
    pub fn into_result(self) -> Result<Vec<PathBuf>, Vec<ItemFailure>> {
        if self.failures.is_empty() {
            Ok(self.paths)
        } else {
            Err(self.failures)
        }
    }
}

/// Main generation service.
pub struct GenerationService {
    renderer: RenderService,
    writer: OutputWriter,
    options: GenerationOptions,
}

impl GenerationService {
    pub fn new(renderer: RenderService, writer: OutputWriter) -> Self {
        Self::with_options(renderer, writer, GenerationOptions::default())
    }

    pub fn with_options(
        renderer: RenderService,
        writer: OutputWriter,
        options: GenerationOptions,
    ) -> Self {
        Self {
            renderer,
            writer,
            options,
        }
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    /// Generate every enum, then every entity.
    ///
    /// Entity enum references resolve against `enums` only. Re-running with
    /// unchanged input yields identical files and an identical path list.
    #[instrument(
        skip_all,
        fields(
            enums = enums.len(),
            entities = entities.len(),
            output_dir = %output_dir.display(),
            policy = %self.options.policy
        )
    )]
    pub fn generate(
        &self,
        entities: &[Entity],
        enums: &[EnumDefinition],
        output_dir: &Path,
    ) -> GenerationReport {
        info!("Generation started");

        let catalog = EnumCatalog::new(enums);
        let items: Vec<WorkItem<'_>> = enums
            .iter()
            .enumerate()
            .map(|(i, e)| WorkItem::Enum(i, e))
            .chain(entities.iter().enumerate().map(|(i, e)| WorkItem::Entity(i, e)))
            .collect();

        let mut report = GenerationReport::default();

        if self.options.parallel_render {
            let rendered = self.render_parallel(&items, &catalog);
            for (item, content) in items.iter().zip(rendered) {
                let outcome = content.and_then(|c| self.write_item(item, &c, output_dir));
                if !self.record(&mut report, item, outcome) {
                    break;
                }
            }
        } else {
            for item in &items {
                let outcome = self
                    .render_item(item, &catalog)
                    .and_then(|c| self.write_item(item, &c, output_dir));
                if !self.record(&mut report, item, outcome) {
                    break;
                }
            }
        }

        info!(
            written = report.paths.len(),
            failed = report.failures.len(),
            "Generation finished"
        );
        report
    }

    /// Generate a single entity together with the enums it references.
    ///
    /// The enum set is restricted to the entity's direct references, in
    /// first-reference order, de-duplicated by identity.
    #[instrument(skip_all, fields(entity = %entity.name, pool = enum_pool.len()))]
    pub fn generate_entity(
        &self,
        entity: &Entity,
        enum_pool: &[EnumDefinition],
        output_dir: &Path,
    ) -> GenerationReport {
        let closure: Vec<EnumDefinition> = enum_closure(entity, enum_pool)
            .into_iter()
            .cloned()
            .collect();
        debug!(enums = closure.len(), "Enum closure computed");

        self.generate(std::slice::from_ref(entity), &closure, output_dir)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn render_item(&self, item: &WorkItem<'_>, catalog: &EnumCatalog<'_>) -> EntigenResult<String> {
        match item {
            WorkItem::Enum(_, enum_def) => {
                DomainValidator::validate_enum(enum_def)?;
                self.renderer.render_enum(enum_def)
            }
            WorkItem::Entity(_, entity) => {
                DomainValidator::validate_entity(entity)?;
                self.renderer.render_entity(entity, catalog)
            }
        }
    }

    /// Render on scoped worker threads; results come back in item order.
    fn render_parallel(
        &self,
        items: &[WorkItem<'_>],
        catalog: &EnumCatalog<'_>,
    ) -> Vec<EntigenResult<String>> {
        if items.is_empty() {
            return Vec::new();
        }

        let workers = thread::available_parallelism().map_or(1, |n| n.get());
        let chunk_size = items.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = items
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|item| self.render_item(item, catalog))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(items.chunks(chunk_size))
                .flat_map(|(handle, chunk)| {
                    handle.join().unwrap_or_else(|_| {
                        chunk
                            .iter()
                            .map(|_| {
                                Err(EntigenError::Internal {
                                    message: "render worker panicked".into(),
                                })
                            })
                            .collect()
                    })
                })
                .collect()
        })
    }

    fn write_item(
        &self,
        item: &WorkItem<'_>,
        content: &str,
        output_dir: &Path,
    ) -> EntigenResult<PathBuf> {
        self.writer
            .write(output_dir, item.category(), item.name(), content)
    }

    /// Record an outcome; returns whether the batch should go on.
    fn record(
        &self,
        report: &mut GenerationReport,
        item: &WorkItem<'_>,
        outcome: EntigenResult<PathBuf>,
    ) -> bool {
        match outcome {
            Ok(path) => {
                debug!(kind = %item.kind(), name = item.name(), path = %path.display(), "Item generated");
                report.paths.push(path);
                true
            }
            Err(error) => {
                warn!(
                    kind = %item.kind(),
                    index = item.index(),
                    name = item.name(),
                    error = %error,
                    "Item failed"
                );
                report.failures.push(ItemFailure {
                    kind: item.kind(),
                    index: item.index(),
                    name: item.name().to_string(),
                    error,
                });
                self.options.policy == FailurePolicy::ContinueCollectErrors
            }
        }
    }
}

/// One unit of work, carrying its position within its group.
#[derive(Debug, Clone, Copy)]
enum WorkItem<'a> {
    Enum(usize, &'a EnumDefinition),
    Entity(usize, &'a Entity),
}

impl WorkItem<'_> {
    fn kind(&self) -> ItemKind {
        match self {
            Self::Enum(..) => ItemKind::Enum,
            Self::Entity(..) => ItemKind::Entity,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Enum(i, _) | Self::Entity(i, _) => *i,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Enum(_, e) => &e.name,
            Self::Entity(_, e) => &e.name,
        }
    }

    fn category(&self) -> OutputCategory {
        match self {
            Self::Enum(..) => OutputCategory::Enums,
            Self::Entity(..) => OutputCategory::Entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use mockall::mock;

    use super::*;
    use crate::{
        application::{
            ApplicationError,
            ports::{Filesystem, LoadedTemplate, TemplateEngine, TemplateKind, TemplateSource},
        },
        domain::{EntityProperty, EnumId, EnumValue, RenderContext},
        error::ErrorKind,
    };

    // ── Test doubles ──────────────────────────────────────────────────────

    #[derive(Clone, Default)]
    struct RecordingFs {
        files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    }

    impl RecordingFs {
        fn content(&self, path: &Path) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }

        fn count(&self) -> usize {
            self.files.lock().unwrap().len()
        }
    }

    impl Filesystem for RecordingFs {
        fn create_dir_all(&self, _path: &Path) -> EntigenResult<()> {
            Ok(())
        }

        fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), content.to_string());
            Ok(())
        }

        fn read_to_string(&self, path: &Path) -> EntigenResult<String> {
            self.content(path).ok_or_else(|| {
                ApplicationError::FileNotFound {
                    path: path.to_path_buf(),
                }
                .into()
            })
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }
    }

    struct FixedTemplates;

    impl TemplateSource for FixedTemplates {
        fn load(&self, kind: TemplateKind) -> EntigenResult<LoadedTemplate> {
            Ok(LoadedTemplate {
                name: kind.file_stem().into(),
                content: String::new(),
            })
        }
    }

    mock! {
        Engine {}

        impl TemplateEngine for Engine {
            fn render(&self, name: &str, source: &str, context: &RenderContext) -> EntigenResult<String>;
        }
    }

    /// Engine that echoes the item name and namespace.
    fn echo_engine() -> MockEngine {
        let mut engine = MockEngine::new();
        engine.expect_render().returning(|name, _, ctx| {
            let key = if name == "Entity" { "entity" } else { "enum" };
            let item = ctx.get(key).and_then(|v| v["name"].as_str()).unwrap_or("?");
            let ns = ctx.get("namespace").and_then(|v| v.as_str()).unwrap_or("?");
            Ok(format!("{name}:{item}@{ns}"))
        });
        engine
    }

    fn service(engine: MockEngine, fs: &RecordingFs, options: GenerationOptions) -> GenerationService {
        GenerationService::with_options(
            RenderService::new(Box::new(FixedTemplates), Box::new(engine)),
            OutputWriter::new(Box::new(fs.clone())),
            options,
        )
    }

    fn continue_policy() -> GenerationOptions {
        GenerationOptions {
            policy: FailurePolicy::ContinueCollectErrors,
            parallel_render: false,
        }
    }

    fn out() -> PathBuf {
        PathBuf::from("/out")
    }

    // ── Ordering ──────────────────────────────────────────────────────────

    #[test]
    fn enums_are_generated_before_entities_in_input_order() {
        let fs = RecordingFs::default();
        let svc = service(echo_engine(), &fs, GenerationOptions::default());

        let enums = vec![EnumDefinition::new("Zeta"), EnumDefinition::new("Alpha")];
        let entities = vec![Entity::new("Order"), Entity::new("Customer")];

        let report = svc.generate(&entities, &enums, &out());

        assert!(report.is_success());
        assert_eq!(
            report.paths,
            vec![
                PathBuf::from("/out/Enums/Zeta.rs"),
                PathBuf::from("/out/Enums/Alpha.rs"),
                PathBuf::from("/out/Entities/Order.rs"),
                PathBuf::from("/out/Entities/Customer.rs"),
            ]
        );
        assert_eq!(
            fs.content(Path::new("/out/Entities/Order.rs")).as_deref(),
            Some("Entity:Order@generated")
        );
    }

    #[test]
    fn rerun_is_idempotent() {
        let fs = RecordingFs::default();
        let svc = service(echo_engine(), &fs, GenerationOptions::default());
        let enums = vec![EnumDefinition::new("Status").with_namespace("shop")];
        let entities = vec![Entity::new("Order").with_namespace("shop")];

        let first = svc.generate(&entities, &enums, &out());
        let snapshot = fs.files.lock().unwrap().clone();
        let second = svc.generate(&entities, &enums, &out());

        assert_eq!(first, second);
        assert_eq!(*fs.files.lock().unwrap(), snapshot);
    }

    #[test]
    fn parallel_render_keeps_order() {
        let fs = RecordingFs::default();
        let svc = service(
            echo_engine(),
            &fs,
            GenerationOptions {
                policy: FailurePolicy::StopOnFirstError,
                parallel_render: true,
            },
        );
        let entities: Vec<_> = (0..17).map(|i| Entity::new(format!("E{i:02}"))).collect();

        let report = svc.generate(&entities, &[], &out());

        let expected: Vec<_> = (0..17)
            .map(|i| PathBuf::from(format!("/out/Entities/E{i:02}.rs")))
            .collect();
        assert_eq!(report.paths, expected);
    }

    // ── Failure policies ──────────────────────────────────────────────────

    fn batch_with_broken_middle() -> Vec<Entity> {
        vec![
            Entity::new("First"),
            Entity::new("Second")
                .with_property(EntityProperty::new("status", "Status").referencing(EnumId::new())),
            Entity::new("Third"),
        ]
    }

    #[test]
    fn continue_collect_errors_attempts_every_item() {
        let fs = RecordingFs::default();
        let svc = service(echo_engine(), &fs, continue_policy());

        let report = svc.generate(&batch_with_broken_middle(), &[], &out());

        assert_eq!(
            report.paths,
            vec![
                PathBuf::from("/out/Entities/First.rs"),
                PathBuf::from("/out/Entities/Third.rs"),
            ]
        );
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.kind, ItemKind::Entity);
        assert_eq!(failure.index, 1);
        assert_eq!(failure.name, "Second");
        assert_eq!(failure.error.kind(), ErrorKind::UnresolvedEnumReference);
    }

    #[test]
    fn stop_on_first_error_keeps_earlier_files() {
        let fs = RecordingFs::default();
        let svc = service(echo_engine(), &fs, GenerationOptions::default());

        let report = svc.generate(&batch_with_broken_middle(), &[], &out());

        assert_eq!(report.paths, vec![PathBuf::from("/out/Entities/First.rs")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(fs.count(), 1);
        assert!(report.into_result().is_err());
    }

    #[test]
    fn engine_errors_are_attributed_to_the_item() {
        let mut engine = MockEngine::new();
        engine.expect_render().returning(|name, _, _| {
            if name == "Enum" {
                Err(ApplicationError::RenderError {
                    template: name.into(),
                    reason: "undefined variable".into(),
                }
                .into())
            } else {
                Ok(String::from("ok"))
            }
        });
        let fs = RecordingFs::default();
        let svc = service(engine, &fs, continue_policy());

        let enums = vec![EnumDefinition::new("A"), EnumDefinition::new("B")];
        let report = svc.generate(&[Entity::new("E")], &enums, &out());

        assert_eq!(report.paths, vec![PathBuf::from("/out/Entities/E.rs")]);
        let failed: Vec<_> = report
            .failures
            .iter()
            .map(|f| (f.kind, f.index, f.error.kind()))
            .collect();
        assert_eq!(
            failed,
            vec![
                (ItemKind::Enum, 0, ErrorKind::RenderError),
                (ItemKind::Enum, 1, ErrorKind::RenderError),
            ]
        );
    }

    #[test]
    fn invalid_metadata_never_reaches_the_engine() {
        let mut engine = MockEngine::new();
        engine.expect_render().never();
        let fs = RecordingFs::default();
        let svc = service(engine, &fs, continue_policy());

        let dup = Entity::new("Dup")
            .with_property(EntityProperty::new("a", "i32"))
            .with_property(EntityProperty::new("a", "i64"));
        let report = svc.generate(&[dup], &[EnumDefinition::new("")], &out());

        assert!(report.paths.is_empty());
        let kinds: Vec<_> = report.failures.iter().map(|f| f.error.kind()).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::InvalidMetadata, ErrorKind::DuplicatePropertyName]
        );
    }

    // ── Single-entity scope ───────────────────────────────────────────────

    #[test]
    fn single_entity_generates_only_its_enum_closure() {
        let fs = RecordingFs::default();
        let svc = service(echo_engine(), &fs, GenerationOptions::default());

        let pool: Vec<_> = (0..10)
            .map(|i| EnumDefinition::new(format!("E{i}")).with_value(EnumValue::new("A", i)))
            .collect();
        let entity = Entity::new("Thing")
            .with_property(EntityProperty::new("x", "E5").referencing(pool[5].id))
            .with_property(EntityProperty::new("y", "E3").referencing(pool[3].id))
            .with_property(EntityProperty::new("z", "E5").referencing(pool[5].id));

        let report = svc.generate_entity(&entity, &pool, &out());

        assert_eq!(
            report.paths,
            vec![
                PathBuf::from("/out/Enums/E5.rs"),
                PathBuf::from("/out/Enums/E3.rs"),
                PathBuf::from("/out/Entities/Thing.rs"),
            ]
        );
    }

    #[test]
    fn policy_parses_textual_forms() {
        assert_eq!(
            "stop-on-first-error".parse::<FailurePolicy>(),
            Ok(FailurePolicy::StopOnFirstError)
        );
        assert_eq!(
            "Continue-Collect-Errors".parse::<FailurePolicy>(),
            Ok(FailurePolicy::ContinueCollectErrors)
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::ContinueCollectErrors.to_string(), "continue-collect-errors");
    }
}
