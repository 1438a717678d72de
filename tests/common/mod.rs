//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_generator_tree();
//! fixture.command().arg("plan").assert().success();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::kustomizations;
    pub use super::TestFixture;
}

/// Kustomization documents used across tests.
#[allow(dead_code)]
pub mod kustomizations {
    /// Config map and secret generators with plain and remapped files.
    pub const GENERATORS: &str = r#"configMapGenerator:
  - name: app-env
    envs:
      - app.env
  - name: app-config
    files:
      - credentials.pub=credentials.local.pub
      - setup.json

secretGenerator:
  - name: app-env-secrets
    envs:
      - secrets.env
  - name: app-config-secrets
    files:
      - credentials.key=credentials.local.key
      - eyesonly.txt
"#;

    /// Files referenced by [`GENERATORS`].
    pub const GENERATOR_FILES: [(&str, &str); 6] = [
        ("app.env", "LOG_LEVEL=debug\n"),
        ("credentials.local.pub", "ssh-ed25519 AAAA public\n"),
        ("setup.json", "{\"replicas\": 2}\n"),
        ("secrets.env", "PASSWORD=hunter2\n"),
        ("credentials.local.key", "-----BEGIN KEY-----\n"),
        ("eyesonly.txt", "classified\n"),
    ];

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "configMapGenerator: [unclosed";
}

/// A temporary directory holding a kustomization source tree.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add the generator kustomization under `src/` with all referenced
    /// files and one unreferenced file.
    #[allow(dead_code)]
    pub fn with_generator_tree(self) -> Self {
        let mut fixture = self.with_file("src/kustomization.yaml", kustomizations::GENERATORS);
        for (path, content) in kustomizations::GENERATOR_FILES {
            fixture = fixture.with_file(&format!("src/{}", path), content);
        }
        fixture.with_file("src/notes.md", "not referenced\n")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a child of the temporary directory.
    #[allow(dead_code)]
    pub fn join(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join(path)
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("kustomize-mirror");
        cmd.current_dir(self.path())
            .env_remove("KUSTOMIZE_MIRROR_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted relative paths of every file under `root`.
#[allow(dead_code)]
pub fn list_tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    files.sort();
    files
}
