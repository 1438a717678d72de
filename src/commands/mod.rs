//! # CLI Command Implementations
//!
//! Each subcommand of `kustomize-mirror` lives in its own module with an
//! `Args` struct derived with `clap` and an `execute` function that calls
//! into the `kustomize_mirror` library.

pub mod args;
pub mod completions;
pub mod mirror;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kustomize_mirror::config::{self, RenderConfig};

/// Load the render configuration, falling back to defaults when absent.
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    config::from_file(path)
        .with_context(|| format!("Failed to load configuration '{}'", path.display()))
}

/// Source directory from the command line, else the first configured path,
/// else the current directory.
pub fn source_dir(explicit: Option<PathBuf>, config: &RenderConfig) -> PathBuf {
    explicit
        .or_else(|| config.kustomize.paths.first().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_dir_precedence() {
        let mut config = RenderConfig::default();
        assert_eq!(source_dir(None, &config), PathBuf::from("."));

        config.kustomize.paths = vec!["overlays/prod".to_string()];
        assert_eq!(source_dir(None, &config), PathBuf::from("overlays/prod"));
        assert_eq!(
            source_dir(Some(PathBuf::from("base")), &config),
            PathBuf::from("base")
        );
    }
}
