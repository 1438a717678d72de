//! # Mirror Command Implementation
//!
//! Stages the file closure of a kustomization into a destination directory
//! and prints the `kustomize build` command line that builds the staged copy.
//! The source tree is never modified.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use kustomize_mirror::args::{build_command_line, shell_join};
use kustomize_mirror::filesystem::DirFs;
use kustomize_mirror::mirror;
use kustomize_mirror::output::OutputConfig;

/// Copy the file closure of a kustomization into a destination directory
#[derive(Args, Debug)]
pub struct MirrorArgs {
    /// Directory holding the kustomization (defaults to the first configured
    /// path, then the current directory)
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory; created if missing
    #[arg(short, long, value_name = "DIR")]
    pub dest: PathBuf,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `mirror` command.
pub fn execute(args: MirrorArgs, config_path: &Path, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config = super::load_config(config_path)?;
    let source = super::source_dir(args.source, &config);

    let mut destination = DirFs::new(&args.dest)
        .with_context(|| format!("Failed to prepare destination '{}'", args.dest.display()))?;
    let mapping = mirror::mirror(&source, &mut destination)
        .with_context(|| format!("Failed to mirror '{}'", source.display()))?;

    if args.quiet {
        return Ok(());
    }

    for dst in mapping.destinations() {
        println!("{} {}", out.ok(), dst.display());
    }
    println!(
        "{} Mirrored {} file(s) into {}",
        out.info(),
        mapping.len(),
        destination.root().display()
    );

    let build_dir = match mapping.kustomization_dir() {
        dir if dir.as_os_str().is_empty() => destination.root().to_path_buf(),
        dir => destination.root().join(dir),
    };
    let mut command = vec![config.kustomize.binary.clone()];
    command.extend(build_command_line(
        &config.kustomize.build_args,
        &build_dir.to_string_lossy(),
    ));
    println!("{} {}", out.info(), shell_join(&command));

    Ok(())
}
