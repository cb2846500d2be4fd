//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use entigen_core::application::FailurePolicy;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "entigen",
    bin_name = "entigen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate source files for entities and enums from metadata",
    long_about = "entigen extracts entity metadata from Rust source files and renders \
                  entities and enums through templates into source files.",
    after_help = "EXAMPLES:\n\
        \x20 entigen extract src/models/order.rs --format json\n\
        \x20 entigen scaffold src/models -o generated\n\
        \x20 entigen generate shop.toml -t templates --policy continue-collect-errors\n\
        \x20 entigen completions bash > /usr/share/bash-completion/completions/entigen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the metadata extracted from a source file.
    #[command(
        visible_alias = "x",
        about = "Extract entity metadata from a source file",
        after_help = "EXAMPLES:\n\
            \x20 entigen extract src/order.rs\n\
            \x20 entigen extract src/order.rs --format toml > order.toml"
    )]
    Extract(ExtractArgs),

    /// Extract entities from source and generate them.
    #[command(
        visible_alias = "s",
        about = "Generate entity files straight from source files",
        after_help = "EXAMPLES:\n\
            \x20 entigen scaffold src/order.rs\n\
            \x20 entigen scaffold src/models -t templates -o generated"
    )]
    Scaffold(ScaffoldArgs),

    /// Generate entities and enums from a metadata document.
    #[command(
        visible_alias = "g",
        about = "Generate entities and enums from a metadata file",
        after_help = "EXAMPLES:\n\
            \x20 entigen generate shop.toml\n\
            \x20 entigen generate shop.json --entity Order -o generated\n\
            \x20 entigen generate shop.toml --policy continue-collect-errors --parallel"
    )]
    Generate(GenerateArgs),

    /// Initialise an entigen configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 entigen init                     # default location\n\
            \x20 entigen init -c ./entigen.toml   # explicit location\n\
            \x20 entigen init --force             # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 entigen completions bash > ~/.local/share/bash-completion/completions/entigen\n\
            \x20 entigen completions zsh  > ~/.zfunc/_entigen\n\
            \x20 entigen completions fish > ~/.config/fish/completions/entigen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the entigen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 entigen config get output.dir\n\
            \x20 entigen config list\n\
            \x20 entigen config path"
    )]
    Config(ConfigCommands),
}

// ── extract ───────────────────────────────────────────────────────────────────

/// Arguments for `entigen extract`.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Rust source file declaring the type.
    #[arg(value_name = "SOURCE", help = "Source file to extract from")]
    pub source: PathBuf,

    /// How to print the entity.
    #[arg(
        long = "format",
        value_enum,
        default_value = "summary",
        help = "Output format"
    )]
    pub format: ExtractFormat,
}

/// Output format for the `extract` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractFormat {
    /// Human-readable listing.
    Summary,
    /// Pretty JSON.
    Json,
    /// TOML.
    Toml,
}

// ── shared generation flags ───────────────────────────────────────────────────

/// Template and output locations shared by `scaffold` and `generate`.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Directory holding `Entity.<ext>` and `Enum.<ext>`.
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        help = "Template directory (default: built-in templates)"
    )]
    pub templates: Option<PathBuf>,

    /// Root of the generated tree.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory (default: output.dir from config)"
    )]
    pub output: Option<PathBuf>,

    /// What to do when an item fails.
    #[arg(
        long = "policy",
        value_name = "POLICY",
        help = "stop-on-first-error or continue-collect-errors"
    )]
    pub policy: Option<FailurePolicy>,

    /// Render items on multiple threads.
    #[arg(long = "parallel", help = "Render in parallel (writes stay ordered)")]
    pub parallel: bool,
}

// ── scaffold ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen scaffold`.
#[derive(Debug, Args)]
pub struct ScaffoldArgs {
    /// A source file, or a directory searched recursively for `.rs` files.
    #[arg(value_name = "SOURCE", help = "Source file or directory")]
    pub source: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `entigen generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Metadata document (`.toml` or `.json`).
    #[arg(value_name = "METADATA", help = "Metadata file (TOML or JSON)")]
    pub metadata: PathBuf,

    /// Generate only this entity and the enums it references.
    #[arg(
        short = 'e',
        long = "entity",
        value_name = "NAME",
        help = "Only generate this entity and its enums"
    )]
    pub entity: Option<String>,

    #[command(flatten)]
    pub render: RenderArgs,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `entigen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `entigen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `entigen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `output.dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "entigen",
            "generate",
            "shop.toml",
            "--entity",
            "Order",
            "-t",
            "templates",
            "-o",
            "out",
            "--policy",
            "continue-collect-errors",
            "--parallel",
        ]);

        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate command");
        };
        assert_eq!(args.metadata, PathBuf::from("shop.toml"));
        assert_eq!(args.entity.as_deref(), Some("Order"));
        assert_eq!(args.render.templates, Some(PathBuf::from("templates")));
        assert_eq!(args.render.output, Some(PathBuf::from("out")));
        assert_eq!(args.render.policy, Some(FailurePolicy::ContinueCollectErrors));
        assert!(args.render.parallel);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = Cli::try_parse_from(["entigen", "generate", "a.toml", "--policy", "retry"]);
        assert!(result.is_err());
    }

    #[test]
    fn extract_defaults_to_summary() {
        let cli = Cli::parse_from(["entigen", "extract", "order.rs"]);
        let Commands::Extract(args) = cli.command else {
            panic!("expected Extract command");
        };
        assert_eq!(args.format, ExtractFormat::Summary);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["entigen", "scaffold", "src", "-vv", "--no-color"]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["entigen", "--quiet", "--verbose", "config", "list"]);
        assert!(result.is_err());
    }
}
