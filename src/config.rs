//! # Render Configuration
//!
//! This module defines the optional `.kustomize-mirror.yaml` file that lets a
//! project pin the kustomize invocation instead of repeating CLI flags:
//!
//! ```yaml
//! kustomize:
//!   paths: [overlays/prod]
//!   buildArgs:
//!     - --load-restrictor LoadRestrictionsNone
//!   binary: kustomize
//! ```
//!
//! Every field is optional. A missing file yields the defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".kustomize-mirror.yaml";

/// Default kustomize executable
pub const DEFAULT_BINARY: &str = "kustomize";

/// Kustomize settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KustomizeConfig {
    /// Kustomization directories to stage and build
    #[serde(default)]
    pub paths: Vec<String>,
    /// Extra arguments for `kustomize build`; entries may hold several
    /// whitespace-separated flags
    #[serde(default)]
    pub build_args: Vec<String>,
    /// Executable to invoke
    #[serde(default = "default_binary")]
    pub binary: String,
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

impl Default for KustomizeConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            build_args: Vec::new(),
            binary: default_binary(),
        }
    }
}

/// Top-level render configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub kustomize: KustomizeConfig,
}

/// Parse a render configuration from YAML.
pub fn parse(yaml: &str) -> Result<RenderConfig> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })?;
    if value.is_null() {
        return Ok(RenderConfig::default());
    }

    serde_yaml::from_value(value).map_err(|e| {
        let message = e.to_string();
        let hint = if message.contains("unknown field") {
            Some("supported keys are kustomize.paths, kustomize.buildArgs and kustomize.binary".to_string())
        } else if message.contains("invalid type") {
            Some("paths and buildArgs must be lists of strings".to_string())
        } else {
            None
        };
        Error::ConfigParse { message, hint }
    })
}

/// Load a render configuration from a file; a missing file yields defaults.
pub fn from_file(path: &Path) -> Result<RenderConfig> {
    if !path.exists() {
        log::debug!(
            "No configuration at '{}', using defaults",
            path.display()
        );
        return Ok(RenderConfig::default());
    }

    let content = fs::read_to_string(path)?;
    parse(&content)
}
