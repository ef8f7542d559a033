//! Command-line interface for config-keys
//!
//! A thin layer over [`ConfigManager`]: every command loads the generator
//! settings, opens the manager (which regenerates the artifact) and then
//! reads or updates the document.

use crate::config::{CliOverrides, GeneratorConfig};
use crate::manager::ConfigManager;
use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod commands;
pub mod output;

pub use output::Output;

/// Generate typed Rust accessors from a JSON configuration document
#[derive(Parser, Debug)]
#[command(
    name = "config-keys",
    version = crate::VERSION,
    about = "Generate typed Rust accessors from a JSON configuration document",
    long_about = "config-keys infers a schema for an arbitrary JSON configuration document, \
                  writes one Rust struct per record shape, and keeps that generated file in \
                  sync as the document is updated."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom settings file (TOML or JSON)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Source document to generate from
    #[arg(long, value_name = "FILE", global = true)]
    pub source: Option<PathBuf>,

    /// Where to write the generated Rust source
    #[arg(long, value_name = "FILE", global = true)]
    pub artifact: Option<PathBuf>,

    /// Name of the root struct
    #[arg(long, value_name = "NAME", global = true)]
    pub root_type: Option<String>,

    /// Directory searched for module templates
    #[arg(long, value_name = "DIR", global = true)]
    pub modules_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate the accessor source from the document
    Generate(commands::generate::GenerateArgs),
    /// Print the current document
    Show(commands::show::ShowArgs),
    /// Print the typed value at a dotted key path
    Get(commands::get::GetArgs),
    /// Set one value at a dotted key path
    Set(commands::set::SetArgs),
    /// Deep-merge a JSON object into the document
    Save(commands::save::SaveArgs),
    /// Merge module configuration templates into the document
    Consolidate(commands::consolidate::ConsolidateArgs),
    /// List the generated types and the key paths they came from
    Types(commands::types::TypesArgs),
}

/// Everything a command needs
pub struct Context {
    pub settings: GeneratorConfig,
    pub output: Output,
    pub base_dir: PathBuf,
}

impl Context {
    /// Open the manager, running the full pipeline once
    pub fn open_manager(&self) -> Result<ConfigManager> {
        let options = self.settings.manager_options(&self.base_dir);
        let source = options.source_path.display().to_string();
        ConfigManager::open(options).with_context(|| format!("Failed to load {source}"))
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.settings.modules_dir_in(&self.base_dir)
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        // Change directory if specified
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        let overrides = CliOverrides {
            source_path: self.source,
            artifact_path: self.artifact,
            root_type: self.root_type,
            modules_dir: self.modules_dir,
        };
        let overrides = (!overrides.is_empty()).then_some(overrides);
        let settings = GeneratorConfig::load(self.config.as_deref(), overrides)?;

        let context = Context {
            settings,
            output: Output::new(self.verbose > 0, self.quiet),
            base_dir: Path::new(".").to_path_buf(),
        };

        match self.command {
            Commands::Generate(args) => commands::generate::execute(args, &context),
            Commands::Show(args) => commands::show::execute(args, &context),
            Commands::Get(args) => commands::get::execute(args, &context),
            Commands::Set(args) => commands::set::execute(args, &context),
            Commands::Save(args) => commands::save::execute(args, &context),
            Commands::Consolidate(args) => commands::consolidate::execute(args, &context),
            Commands::Types(args) => commands::types::execute(args, &context),
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
