//! # Kustomization Document Model
//!
//! This module defines a partial schema of a `kustomization.yaml` document.
//! Only the fields that reference other files are typed:
//!
//! - **Generators** (`configMapGenerator`, `secretGenerator`): each entry's
//!   `envs`, legacy `env` and `files` lists.
//! - **Resources** (`resources`, `bases`, `components`): local files or
//!   directories holding nested kustomizations.
//! - **Patches and CRDs** (`patchesStrategicMerge`, `patches`,
//!   `patchesJson6902`, `crds`): local files.
//! - **Plugins** (`transformers`, `generators`, `validators`): plugin config
//!   files or kustomization directories. Inline configs are skipped.
//! - **Other inputs** (`configurations`, `replacements[].path`,
//!   `openapi.path`): local files.
//!
//! Every other field, both at the top level and inside generator and patch
//! entries, is kept in an ordered `serde_yaml::Mapping` and written back
//! unchanged when the document is serialized.
//!
//! ## File sources
//!
//! A generator `files` entry is either a bare path (`setup.json`) or a
//! remapped key (`credentials.pub=credentials.local.pub`). `FileSource` parses
//! the entry once into a key and a path; only the path is a filesystem
//! location.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// File names recognized as kustomization documents, in lookup order.
pub const KUSTOMIZATION_FILE_NAMES: [&str; 3] =
    ["kustomization.yaml", "kustomization.yml", "Kustomization"];

/// Find the kustomization document in `dir`.
pub fn find(dir: &Path) -> Result<PathBuf> {
    KUSTOMIZATION_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::KustomizationNotFound {
            dir: dir.to_path_buf(),
        })
}

/// Whether `dir` holds a kustomization document.
pub fn is_kustomization_dir(dir: &Path) -> bool {
    find(dir).is_ok()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A generator `files` entry: an optional key and the path to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileSource {
    /// Key inside the generated object, when remapped with `key=path`.
    pub key: Option<String>,
    /// Path of the file, relative to the kustomization directory.
    pub path: String,
}

impl FileSource {
    /// Parse an entry, splitting on the first `=`.
    pub fn parse(entry: &str) -> Self {
        match entry.split_once('=') {
            Some((key, path)) => Self {
                key: Some(key.to_string()),
                path: path.to_string(),
            },
            None => Self {
                key: None,
                path: entry.to_string(),
            },
        }
    }
}

impl From<String> for FileSource {
    fn from(entry: String) -> Self {
        Self::parse(&entry)
    }
}

impl From<FileSource> for String {
    fn from(source: FileSource) -> Self {
        source.to_string()
    }
}

impl fmt::Display for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}={}", key, self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// One `configMapGenerator` or `secretGenerator` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorArgs {
    /// Name of the generated object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Env files, one `KEY=value` per line
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub envs: Vec<String>,
    /// Deprecated single env file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,
    /// Files whose contents become values
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub files: Vec<FileSource>,
    /// Everything else (`literals`, `behavior`, `options`, ...)
    #[serde(flatten)]
    pub other: Mapping,
}

impl GeneratorArgs {
    /// Display name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// An entry whose only interpreted field is `path`: `patches`,
/// `patchesJson6902` and `replacements` items, and the `openapi` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(flatten)]
    pub other: Mapping,
}

/// Partial kustomization document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kustomization {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub resources: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bases: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub components: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub crds: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub patches_strategic_merge: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub patches: Vec<PathRef>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub patches_json6902: Vec<PathRef>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub config_map_generator: Vec<GeneratorArgs>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub secret_generator: Vec<GeneratorArgs>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub transformers: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub generators: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub validators: Vec<String>,
    /// Transformer configuration files
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub configurations: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub replacements: Vec<PathRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openapi: Option<PathRef>,
    /// Fields this model does not interpret
    #[serde(flatten)]
    pub other: Mapping,
}

/// How a referenced path is used by kustomize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Generator input; must be a file
    Generator,
    /// Resource, base, component or plugin entry; a file or a
    /// kustomization directory
    Resource,
    /// Patch, CRD, configuration, replacement or OpenAPI schema file
    File,
}

/// A local path referenced by a kustomization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The entry as written in the document
    pub entry: String,
    /// The filesystem path part of the entry
    pub path: String,
    pub kind: ReferenceKind,
}

impl Reference {
    fn new(entry: impl Into<String>, path: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            entry: entry.into(),
            path: path.into(),
            kind,
        }
    }
}

impl Kustomization {
    /// Parse a kustomization from YAML text.
    ///
    /// An empty document (or one holding only comments) is an empty
    /// kustomization.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let value: Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value)
    }

    /// Read and parse the kustomization document at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::KustomizationParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| Error::KustomizationParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// All generator entries, config maps first.
    pub fn generator_args(&self) -> impl Iterator<Item = &GeneratorArgs> {
        self.config_map_generator
            .iter()
            .chain(self.secret_generator.iter())
    }

    fn plugins(&self) -> impl Iterator<Item = &String> {
        self.transformers
            .iter()
            .chain(&self.generators)
            .chain(&self.validators)
    }

    /// Every local or remote path this document references, in document
    /// order within each field.
    ///
    /// Inline patches (`patch:` bodies or multi-line strategic merge
    /// entries) and inline plugin configs are not references and are
    /// skipped.
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();

        for entry in self
            .resources
            .iter()
            .chain(&self.bases)
            .chain(&self.components)
        {
            refs.push(Reference::new(entry, entry, ReferenceKind::Resource));
        }
        for entry in self.plugins().filter(|e| !is_inline(e)) {
            refs.push(Reference::new(entry, entry, ReferenceKind::Resource));
        }

        for entry in self
            .crds
            .iter()
            .chain(self.patches_strategic_merge.iter().filter(|e| !is_inline(e)))
            .chain(&self.configurations)
        {
            refs.push(Reference::new(entry, entry, ReferenceKind::File));
        }
        for path in self.path_refs().filter_map(|r| r.path.as_ref()) {
            refs.push(Reference::new(path, path, ReferenceKind::File));
        }

        for generator in self.generator_args() {
            for env in generator.envs.iter().chain(&generator.env) {
                refs.push(Reference::new(env, env, ReferenceKind::Generator));
            }
            for file in &generator.files {
                refs.push(Reference::new(
                    file.to_string(),
                    &file.path,
                    ReferenceKind::Generator,
                ));
            }
        }

        refs
    }

    fn path_refs(&self) -> impl Iterator<Item = &PathRef> {
        self.patches
            .iter()
            .chain(&self.patches_json6902)
            .chain(&self.replacements)
            .chain(&self.openapi)
    }

    /// Replace every referenced path using `rewrite`, which returns the new
    /// path or `None` to keep the old one. Keys of remapped generator files
    /// and inline entries are untouched.
    ///
    /// Returns whether any path changed.
    pub fn rewrite_paths<F>(&mut self, mut rewrite: F) -> bool
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut changed = false;
        let mut apply = |path: &mut String| {
            if is_inline(path) {
                return;
            }
            if let Some(new_path) = rewrite(path) {
                if *path != new_path {
                    *path = new_path;
                    changed = true;
                }
            }
        };

        let lists = [
            &mut self.resources,
            &mut self.bases,
            &mut self.components,
            &mut self.crds,
            &mut self.patches_strategic_merge,
            &mut self.transformers,
            &mut self.generators,
            &mut self.validators,
            &mut self.configurations,
        ];
        for entry in lists.into_iter().flatten() {
            apply(entry);
        }

        for path_ref in self
            .patches
            .iter_mut()
            .chain(self.patches_json6902.iter_mut())
            .chain(self.replacements.iter_mut())
            .chain(self.openapi.iter_mut())
        {
            if let Some(path) = path_ref.path.as_mut() {
                apply(path);
            }
        }

        for generator in self
            .config_map_generator
            .iter_mut()
            .chain(self.secret_generator.iter_mut())
        {
            for env in generator.envs.iter_mut().chain(generator.env.iter_mut()) {
                apply(env);
            }
            for file in generator.files.iter_mut() {
                apply(&mut file.path);
            }
        }

        changed
    }
}

/// Multi-line entries hold inline YAML rather than a path.
fn is_inline(entry: &str) -> bool {
    entry.contains('\n')
}
