//! `entigen scaffold` — extract entities from source and generate them.

use std::path::Path;

use tracing::{info, instrument, warn};

use entigen_adapters::{DEFAULT_SOURCE_EXTENSION, LocalFilesystem, SynSourceParser, discover_sources};
use entigen_core::{
    application::{ExtractionService, FailurePolicy, GenerationReport, ItemFailure, ItemKind},
    domain::{DomainError, Entity},
    error::EntigenError,
};

use crate::{
    cli::ScaffoldArgs,
    commands::{Pipeline, finish},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Extract an entity from each source file, then generate all of them.
///
/// Sources that fail extraction, or that declare a struct name an earlier
/// source already declared, are reported like failed items: the stop policy
/// halts before anything is written, the continue policy generates what could
/// be extracted. Every reported index is the position of the source file in
/// discovery order.
#[instrument(skip_all, fields(source = %args.source.display()))]
pub fn execute(args: ScaffoldArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let sources = discover_sources(&args.source, DEFAULT_SOURCE_EXTENSION)?;
    if sources.is_empty() {
        return Err(CliError::NoSources { path: args.source });
    }

    let pipeline = Pipeline::new(&args.render, &config);
    let policy = pipeline.service.options().policy;
    let extraction = ExtractionService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SynSourceParser::new()),
    );

    // `origins[i]` is the source index entity `i` was extracted from.
    let mut entities: Vec<Entity> = Vec::with_capacity(sources.len());
    let mut origins: Vec<usize> = Vec::with_capacity(sources.len());
    let mut failures = Vec::new();
    for (index, path) in sources.iter().enumerate() {
        let outcome = extraction.extract_file(path).and_then(|entity| {
            match entities.iter().position(|e| e.name == entity.name) {
                Some(first) => Err(duplicate_entity(&entity.name, &sources[origins[first]])),
                None => Ok(entity),
            }
        });
        match outcome {
            Ok(entity) => {
                entities.push(entity);
                origins.push(index);
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "Source skipped");
                failures.push(ItemFailure {
                    kind: ItemKind::Entity,
                    index,
                    name: path.display().to_string(),
                    error,
                });
                if policy == FailurePolicy::StopOnFirstError {
                    break;
                }
            }
        }
    }

    // A single source keeps its original error and exit code.
    if sources.len() == 1 {
        if let Some(failure) = failures.pop() {
            return Err(failure.error.into());
        }
    }

    let mut report = if failures.is_empty() || policy == FailurePolicy::ContinueCollectErrors {
        pipeline.service.generate(&entities, &[], &pipeline.output_dir)
    } else {
        GenerationReport::default()
    };
    info!(
        sources = sources.len(),
        extracted = entities.len(),
        written = report.paths.len(),
        "Scaffold finished"
    );

    for failure in &mut report.failures {
        if let Some(&origin) = origins.get(failure.index) {
            failure.index = origin;
        }
    }
    failures.append(&mut report.failures);
    failures.sort_by_key(|f| f.index);
    report.failures = failures;
    finish(report, &output)
}

/// Two sources declaring the same struct would write the same file.
fn duplicate_entity(name: &str, first: &Path) -> EntigenError {
    DomainError::InvalidMetadata(format!(
        "entity '{}' is already defined in {}",
        name,
        first.display()
    ))
    .into()
}
