//! Destination filesystems for staged kustomizations
//!
//! The mirror writes through the [`WritableFs`] trait so it never assumes a
//! real OS directory. Three implementations are provided:
//!
//! - [`MemoryFS`]: in-memory map, used for dry runs and tests.
//! - [`DirFs`]: rooted at an existing host directory.
//! - [`TmpFs`]: owns a fresh temporary directory that is removed on
//!   [`TmpFs::cleanup`] or drop.
//!
//! Every path handed to a `WritableFs` is relative to its root. Absolute paths
//! and paths that climb out of the root are rejected with `Error::Path`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::path::confine;

/// Writable destination for a mirrored source tree
pub trait WritableFs {
    /// Create a directory and all of its parents.
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Write a file, creating parent directories as needed.
    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()>;

    /// Read a file back.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Whether a file or directory exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// All files, as sorted relative paths.
    fn list_files(&self) -> Result<Vec<PathBuf>>;
}

/// In-memory filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) -> Result<()> {
        self.write_file(path.as_ref(), content.as_bytes())
    }

    /// Get a file's content by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over all files as (path, content) pairs, sorted by path
    pub fn files(&self) -> impl Iterator<Item = (&PathBuf, &Vec<u8>)> {
        self.files.iter()
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl WritableFs for MemoryFS {
    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        let path = confine(path)?;
        if self.files.contains_key(&path) {
            return Err(Error::Filesystem {
                message: format!("Cannot create directory '{}': a file exists", path.display()),
            });
        }
        self.add_parents(&path);
        self.dirs.insert(path);
        Ok(())
    }

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        let path = confine(path)?;
        if self.dirs.contains(&path) {
            return Err(Error::Filesystem {
                message: format!("Cannot write file '{}': a directory exists", path.display()),
            });
        }
        self.add_parents(&path);
        self.files.insert(path, content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let path = confine(path)?;
        self.files
            .get(&path)
            .cloned()
            .ok_or_else(|| Error::Filesystem {
                message: format!("File not found: {}", path.display()),
            })
    }

    fn exists(&self, path: &Path) -> bool {
        match confine(path) {
            Ok(path) => self.files.contains_key(&path) || self.dirs.contains(&path),
            Err(_) => false,
        }
    }

    fn list_files(&self) -> Result<Vec<PathBuf>> {
        Ok(self.files.keys().cloned().collect())
    }
}

/// Filesystem rooted at a host directory
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl DirFs {
    /// Use `root` as the destination, creating it if needed.
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", root.display(), e),
        })?;
        Ok(Self { root })
    }

    /// The host directory backing this filesystem
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(confine(path)?))
    }
}

impl WritableFs for DirFs {
    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        let full_path = self.host_path(path)?;
        fs::create_dir_all(&full_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", full_path.display(), e),
        })
    }

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        let full_path = self.host_path(path)?;

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", parent.display(), e),
            })?;
        }

        fs::write(&full_path, content).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", full_path.display(), e),
        })
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.host_path(path)?;
        fs::read(&full_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read file '{}': {}", full_path.display(), e),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.host_path(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk '{}': {}", self.root.display(), e),
            })?;
            if entry.file_type().is_file() {
                if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                    files.push(relative.to_path_buf());
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Filesystem backed by a temporary directory that is deleted on cleanup
#[derive(Debug)]
pub struct TmpFs {
    dir: TempDir,
    fs: DirFs,
}

impl TmpFs {
    /// Create a temporary directory in the system temp location.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("kustomize-mirror-")
            .tempdir()?;
        Ok(Self::from_temp_dir(dir))
    }

    /// Create a temporary directory inside `parent`.
    pub fn new_in<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("kustomize-mirror-")
            .tempdir_in(parent)?;
        Ok(Self::from_temp_dir(dir))
    }

    fn from_temp_dir(dir: TempDir) -> Self {
        let fs = DirFs {
            root: dir.path().to_path_buf(),
        };
        Self { dir, fs }
    }

    /// Path of the temporary directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Delete the temporary directory and everything in it.
    pub fn cleanup(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

impl WritableFs for TmpFs {
    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        self.fs.create_dir_all(path)
    }

    fn write_file(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        self.fs.write_file(path, content)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.fs.read_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    fn list_files(&self) -> Result<Vec<PathBuf>> {
        self.fs.list_files()
    }
}
