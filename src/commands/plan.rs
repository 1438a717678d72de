//! # Plan Command Implementation
//!
//! Dry run of `mirror`: stages the kustomization into an in-memory filesystem
//! and lists each destination path with the source it comes from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use kustomize_mirror::filesystem::{MemoryFS, WritableFs};
use kustomize_mirror::mirror;
use kustomize_mirror::output::OutputConfig;

/// Show which files a mirror would stage, without writing anything
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Directory holding the kustomization (defaults to the first configured
    /// path, then the current directory)
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,
}

/// Execute the `plan` command.
pub fn execute(args: PlanArgs, config_path: &Path, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config = super::load_config(config_path)?;
    let source = super::source_dir(args.source, &config);

    let mut staged = MemoryFS::new();
    let mapping = mirror::mirror(&source, &mut staged)
        .with_context(|| format!("Failed to plan mirror of '{}'", source.display()))?;

    for (dst, src) in mapping.iter() {
        println!("{} {} <- {}", out.dry_run(), dst.display(), src.display());
    }
    println!(
        "{} {} file(s) from {}, kustomization at {}",
        out.info(),
        staged.list_files()?.len(),
        mapping.staging_root().display(),
        mapping.kustomization().display()
    );

    Ok(())
}
