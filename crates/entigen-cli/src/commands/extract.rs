//! `entigen extract` — print the metadata extracted from a source file.

use tracing::instrument;

use entigen_adapters::{
    LocalFilesystem, MetadataBatch, SynSourceParser,
    metadata_loader::{self, MetadataFormat},
};
use entigen_core::{application::ExtractionService, domain::Entity};

use crate::{
    cli::{ExtractArgs, ExtractFormat},
    error::CliResult,
    output::OutputManager,
};

/// Extract one entity and print it in the requested format.
///
/// `json` and `toml` print a metadata document that `entigen generate`
/// accepts unchanged.
#[instrument(skip_all, fields(source = %args.source.display()))]
pub fn execute(args: ExtractArgs, output: OutputManager) -> CliResult<()> {
    let extraction = ExtractionService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SynSourceParser::new()),
    );
    let entity = extraction.extract_file(&args.source)?;

    match args.format {
        ExtractFormat::Summary => print_summary(&entity, &output)?,
        ExtractFormat::Json => output.data(&document(entity, MetadataFormat::Json)?)?,
        ExtractFormat::Toml => output.data(&document(entity, MetadataFormat::Toml)?)?,
    }

    Ok(())
}

fn document(entity: Entity, format: MetadataFormat) -> CliResult<String> {
    let batch = MetadataBatch {
        enums: Vec::new(),
        entities: vec![entity],
    };
    Ok(metadata_loader::serialize(&batch, format)?)
}

fn print_summary(entity: &Entity, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{}::{}", entity.resolved_namespace(), entity.name))?;
    if let Some(description) = &entity.description {
        output.print(&format!("  {description}"))?;
    }

    for property in &entity.properties {
        let mut flags = Vec::new();
        if property.is_key {
            flags.push("key");
        }
        if property.is_required {
            flags.push("required");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        output.data(&format!(
            "  {}: {}{}",
            property.name, property.type_name, flags
        ))?;
        if !property.description.is_empty() {
            output.print(&format!("      {}", property.description))?;
        }
    }

    Ok(())
}
