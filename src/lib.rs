//! # Kustomize Mirror Library
//!
//! This library stages a kustomization into an isolated directory so the
//! `kustomize` binary can build it out-of-place, and assembles the argument
//! vector for that build. It backs the `kustomize-mirror` command-line tool but
//! is meant to be embedded by any render pipeline that shells out to
//! kustomize.
//!
//! ## Quick Example
//!
//! ```no_run
//! use std::path::Path;
//! use kustomize_mirror::{args, filesystem::TmpFs, mirror};
//!
//! let mut staged = TmpFs::new().unwrap();
//! let mapping = mirror::mirror(Path::new("overlays/prod"), &mut staged).unwrap();
//!
//! let dir = staged.path().join(mapping.kustomization_dir());
//! let argv = args::build_command_line(&["--enable-helm"], &dir.to_string_lossy());
//! assert_eq!(argv[0], "build");
//! ```
//!
//! ## Core Concepts
//!
//! - **Argument building (`args`)**: flattens configured build arguments,
//!   which may carry several whitespace-separated flags each, plus the
//!   kustomization path into one argument vector.
//! - **Kustomization model (`kustomization`)**: a partial schema of
//!   `kustomization.yaml` that types only the file-referencing fields and
//!   passes everything else through untouched.
//! - **Mirroring (`mirror`)**: resolves the transitive file closure of a
//!   kustomization (generator `envs`/`files`, resources, patches, nested
//!   bases) and copies it into a destination filesystem.
//! - **Destination filesystems (`filesystem`)**: the `WritableFs` trait and
//!   its in-memory, directory and temporary-directory implementations.
//! - **Configuration (`config`)**: the optional `.kustomize-mirror.yaml`
//!   render config used by the CLI.

pub mod args;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod kustomization;
pub mod mirror;
pub mod output;
pub mod path;

#[cfg(test)]
mod args_proptest;
