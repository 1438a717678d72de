//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use kustomize_mirror::config::DEFAULT_CONFIG_FILE;

/// Kustomize Mirror - Stage kustomizations for out-of-place builds
#[derive(Parser, Debug)]
#[command(name = "kustomize-mirror")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the render configuration file
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "KUSTOMIZE_MIRROR_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    config: PathBuf,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy the file closure of a kustomization into a destination directory
    Mirror(commands::mirror::MirrorArgs),

    /// Show which files a mirror would stage, without writing anything
    Plan(commands::plan::PlanArgs),

    /// Print the kustomize build command line
    Args(commands::args::ArgsArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Mirror(args) => commands::mirror::execute(args, &self.config, &self.color),
            Commands::Plan(args) => commands::plan::execute(args, &self.config, &self.color),
            Commands::Args(args) => commands::args::execute(args, &self.config),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` records to stderr; `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
