//! # Args Command Implementation
//!
//! Prints the `kustomize build` invocation assembled from the configured
//! build arguments, any `--build-arg` flags and the kustomization path.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use kustomize_mirror::args::{build_command_line, shell_join};

/// Print the kustomize build command line
#[derive(Args, Debug)]
pub struct ArgsArgs {
    /// Extra build argument; may hold several whitespace-separated flags
    #[arg(short = 'a', long = "build-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub build_args: Vec<String>,

    /// Kustomization path (defaults to the first configured path)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Print one token per line instead of a single line
    #[arg(long)]
    pub lines: bool,
}

/// Execute the `args` command.
pub fn execute(args: ArgsArgs, config_path: &Path) -> Result<()> {
    let config = super::load_config(config_path)?;

    let mut build_args = config.kustomize.build_args.clone();
    build_args.extend(args.build_args);

    let path = args
        .path
        .or_else(|| config.kustomize.paths.first().cloned())
        .unwrap_or_default();

    let mut command = vec![config.kustomize.binary.clone()];
    command.extend(build_command_line(&build_args, &path));

    if args.lines {
        for token in &command {
            println!("{}", token);
        }
    } else {
        println!("{}", shell_join(&command));
    }

    Ok(())
}
