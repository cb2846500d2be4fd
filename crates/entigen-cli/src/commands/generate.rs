//! `entigen generate` — render a metadata batch into source files.

use tracing::{info, instrument};

use entigen_adapters::{LocalFilesystem, MetadataLoader};

use crate::{
    cli::GenerateArgs,
    commands::{Pipeline, finish},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Load the metadata document and run the orchestrator over it.
///
/// With `--entity`, only that entity and the enums it references are
/// generated.
#[instrument(skip_all, fields(metadata = %args.metadata.display()))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.entity.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(CliError::InvalidInput {
            message: "--entity needs a non-empty entity name".into(),
        });
    }

    let batch = MetadataLoader::new(Box::new(LocalFilesystem::new())).load(&args.metadata)?;
    if batch.is_empty() {
        output.warning(&format!(
            "{} defines no enums or entities",
            args.metadata.display()
        ))?;
    }

    let pipeline = Pipeline::new(&args.render, &config);

    let report = match &args.entity {
        Some(name) => {
            let entity = batch
                .find_entity(name)
                .ok_or_else(|| CliError::EntityNotFound {
                    name: name.clone(),
                    available: batch.entities.iter().map(|e| e.name.clone()).collect(),
                })?;
            pipeline
                .service
                .generate_entity(entity, &batch.enums, &pipeline.output_dir)
        }
        None => pipeline
            .service
            .generate(&batch.entities, &batch.enums, &pipeline.output_dir),
    };

    info!(
        written = report.paths.len(),
        failed = report.failures.len(),
        "Generation finished"
    );
    finish(report, &output)
}
