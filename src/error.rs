//! # Error Handling
//!
//! This module defines the centralized error type for `kustomize-mirror`. It
//! uses the `thiserror` library to build a single `Error` enum covering every
//! failure the library can report, each carrying enough context (file names,
//! offending entries, computed paths) to diagnose the problem without
//! re-running the build.
//!
//! ## Taxonomy
//!
//! - **Parse errors** (`KustomizationNotFound`, `KustomizationParse`): the
//!   kustomization document is missing or is not valid YAML.
//! - **Resolution errors** (`Resolution`): a generator, resource or patch
//!   references a path that does not exist relative to its kustomization.
//! - **I/O errors** (`Io`, `Filesystem`, `Path`): reading the source tree or
//!   writing the destination failed, or a destination path was rejected.
//! - **Configuration errors** (`ConfigParse`): the render config file could
//!   not be parsed.
//!
//! The `Result<T>` alias is used throughout the library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for kustomize-mirror operations
#[derive(Error, Debug)]
pub enum Error {
    /// No kustomization document exists in the given directory.
    #[error("No kustomization file found in '{}' (looked for {})", dir.display(), crate::kustomization::KUSTOMIZATION_FILE_NAMES.join(", "))]
    KustomizationNotFound { dir: PathBuf },

    /// The kustomization document exists but could not be parsed.
    #[error("Failed to parse kustomization '{}': {message}", path.display())]
    KustomizationParse { path: PathBuf, message: String },

    /// An entry of a kustomization references a path that does not exist.
    ///
    /// `entry` is the entry exactly as written in the document and `path` is
    /// the location it was resolved to.
    #[error("Unresolved reference '{entry}' in '{}': {} does not exist", kustomization.display(), path.display())]
    Resolution {
        kustomization: PathBuf,
        entry: String,
        path: PathBuf,
    },

    /// An error occurred while parsing the render configuration file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred with a destination filesystem operation.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// A destination path was absolute or tried to leave the destination root.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
