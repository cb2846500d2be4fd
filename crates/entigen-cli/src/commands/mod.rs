//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core service calls and display
//! the results. The generation pipeline shared by `scaffold` and `generate`
//! is assembled here.

use std::path::PathBuf;

use serde_json::json;
use tracing::debug;

use entigen_adapters::{BuiltinTemplates, DirectoryTemplates, LocalFilesystem, TeraEngine};
use entigen_core::application::{
    GenerationOptions, GenerationReport, GenerationService, OutputWriter, RenderService,
    ports::TemplateSource,
};

use crate::{
    cli::{OutputFormat, RenderArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub mod completions;
pub mod config;
pub mod extract;
pub mod generate;
pub mod init;
pub mod scaffold;

/// Wired generation pipeline plus the directory it writes below.
pub(crate) struct Pipeline {
    pub service: GenerationService,
    pub output_dir: PathBuf,
}

impl Pipeline {
    /// Assemble adapters from flags, falling back to configuration.
    pub fn new(args: &RenderArgs, config: &AppConfig) -> Self {
        let templates: Box<dyn TemplateSource> =
            match args.templates.as_ref().or(config.templates.dir.as_ref()) {
                Some(dir) => Box::new(DirectoryTemplates::with_extension(
                    dir,
                    config.templates.extension.as_str(),
                )),
                None => Box::new(BuiltinTemplates::new()),
            };

        let mut options: GenerationOptions = config.generation_options();
        if let Some(policy) = args.policy {
            options.policy = policy;
        }
        options.parallel_render |= args.parallel;

        let output_dir = args
            .output
            .clone()
            .unwrap_or_else(|| config.output.dir.clone());

        debug!(
            output_dir = %output_dir.display(),
            policy = %options.policy,
            parallel = options.parallel_render,
            "Pipeline assembled"
        );

        Self {
            service: GenerationService::with_options(
                RenderService::new(templates, Box::new(TeraEngine::new())),
                OutputWriter::with_extension(
                    Box::new(LocalFilesystem::new()),
                    config.output.extension.as_str(),
                ),
                options,
            ),
            output_dir,
        }
    }
}

/// Print every produced path, then every failure, then turn the report into
/// the command's result.
pub(crate) fn finish(report: GenerationReport, output: &OutputManager) -> CliResult<()> {
    match output.format() {
        OutputFormat::Json => {
            let failures: Vec<_> = report
                .failures
                .iter()
                .map(|f| {
                    json!({
                        "kind": f.kind.to_string(),
                        "index": f.index,
                        "name": f.name,
                        "error": f.error.to_string(),
                    })
                })
                .collect();
            output.json(&json!({
                "paths": report.paths,
                "failures": failures,
            }))?;
        }
        OutputFormat::Human => {
            if !report.paths.is_empty() {
                output.header(&format!("Generated {} file(s):", report.paths.len()))?;
            }
            for path in &report.paths {
                output.success(&path.display().to_string())?;
            }
            for failure in &report.failures {
                output.error(&failure.to_string())?;
            }
        }
        OutputFormat::Plain | OutputFormat::Auto => {
            for path in &report.paths {
                output.data(&path.display().to_string())?;
            }
            for failure in &report.failures {
                output.error(&failure.to_string())?;
            }
        }
    }

    report
        .into_result()
        .map(|_| ())
        .map_err(|failures| CliError::GenerationFailed { failures })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use entigen_core::application::FailurePolicy;

    use super::*;

    fn render_args() -> RenderArgs {
        RenderArgs {
            templates: None,
            output: None,
            policy: None,
            parallel: false,
        }
    }

    #[test]
    fn config_supplies_defaults() {
        let mut config = AppConfig::default();
        config.output.dir = PathBuf::from("from-config");
        config.generation.policy = FailurePolicy::ContinueCollectErrors;

        let pipeline = Pipeline::new(&render_args(), &config);

        assert_eq!(pipeline.output_dir, Path::new("from-config"));
        assert_eq!(
            pipeline.service.options().policy,
            FailurePolicy::ContinueCollectErrors
        );
    }

    #[test]
    fn flags_override_config() {
        let config = AppConfig::default();
        let args = RenderArgs {
            output: Some(PathBuf::from("out")),
            policy: Some(FailurePolicy::ContinueCollectErrors),
            parallel: true,
            ..render_args()
        };

        let pipeline = Pipeline::new(&args, &config);

        assert_eq!(pipeline.output_dir, Path::new("out"));
        assert_eq!(
            pipeline.service.options().policy,
            FailurePolicy::ContinueCollectErrors
        );
        assert!(pipeline.service.options().parallel_render);
    }
}
