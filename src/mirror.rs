//! # Source Mirroring
//!
//! This module stages the file closure of a kustomization into an isolated
//! destination so `kustomize build` can run out-of-place, without touching
//! the original tree.
//!
//! ## Process
//!
//! 1.  **Planning (`plan`)**: starting from the source directory, every
//!     kustomization document is parsed and each reference it makes is
//!     resolved: generator `envs`/`env`/`files` entries, resource, CRD,
//!     patch, plugin, configuration, replacement and OpenAPI files, and
//!     nested kustomization directories. Directories are
//!     processed from an explicit work queue; a visited set keyed on the
//!     canonical directory stops self references and cycles. Remote bases are
//!     left to kustomize.
//!
//! 2.  **Layout**: the staging root is the deepest directory containing the
//!     whole closure. Each file keeps its path relative to that root, so the
//!     relative references inside every document stay valid. For a
//!     self-contained tree the staging root is the source directory itself.
//!     Files are keyed on their normalized path, so distinct sources always
//!     land on distinct destinations.
//!
//! 3.  **Rewriting**: absolute references would leak host paths into the
//!     build and bypass the staged copy, so they are rewritten to paths
//!     relative to their document and that document is re-serialized. Every
//!     other document is copied byte-for-byte.
//!
//! 4.  **Copying (`mirror`)**: only after the whole plan resolved, every file
//!     is written to the destination filesystem.
//!
//! Nothing is cleaned up on failure; the caller owns the destination.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::filesystem::WritableFs;
use crate::kustomization::{self, Kustomization, ReferenceKind};
use crate::path::{common_ancestor, is_remote_reference, normalize, relative_to};

/// Resolved layout of a mirrored kustomization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorMapping {
    staging_root: PathBuf,
    kustomization: PathBuf,
    entries: BTreeMap<PathBuf, PathBuf>,
}

impl MirrorMapping {
    /// Source directory that maps to the destination root
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Destination path of the root kustomization document
    pub fn kustomization(&self) -> &Path {
        &self.kustomization
    }

    /// Destination directory of the root kustomization, the path to hand to
    /// `kustomize build`. Empty when it is the destination root.
    pub fn kustomization_dir(&self) -> &Path {
        self.kustomization.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Source file staged at the destination path `dst`
    pub fn source_for<P: AsRef<Path>>(&self, dst: P) -> Option<&Path> {
        self.entries.get(dst.as_ref()).map(PathBuf::as_path)
    }

    /// Iterate over (destination, source) pairs, sorted by destination
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.entries
            .iter()
            .map(|(dst, src)| (dst.as_path(), src.as_path()))
    }

    /// Destination paths, sorted
    pub fn destinations(&self) -> impl Iterator<Item = &Path> {
        self.entries.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How a planned file is produced
#[derive(Debug, Clone)]
enum Staged {
    Copy,
    Rewritten(Vec<u8>),
}

/// Mapping plus the content of rewritten documents
#[derive(Debug)]
struct Plan {
    mapping: MirrorMapping,
    rewritten: HashMap<PathBuf, Vec<u8>>,
}

/// Files and kustomization directories reachable from a source directory
#[derive(Debug)]
struct Closure {
    dirs: Vec<PathBuf>,
    files: BTreeMap<PathBuf, Staged>,
}

/// Breadth-first resolver for the file closure of a kustomization
struct Planner {
    queue: VecDeque<PathBuf>,
    visited: HashSet<PathBuf>,
    closure: Closure,
}

impl Planner {
    fn new(source_dir: PathBuf) -> Self {
        Self {
            queue: VecDeque::from([source_dir]),
            visited: HashSet::new(),
            closure: Closure {
                dirs: Vec::new(),
                files: BTreeMap::new(),
            },
        }
    }

    fn run(mut self) -> Result<Closure> {
        while let Some(dir) = self.queue.pop_front() {
            let key = fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());
            if !self.visited.insert(key) {
                warn!(
                    "Kustomization in '{}' is referenced more than once, mirroring it once",
                    dir.display()
                );
                continue;
            }
            self.visit(&dir)?;
        }

        Ok(self.closure)
    }

    fn visit(&mut self, dir: &Path) -> Result<()> {
        let document = kustomization::find(dir)?;
        let mut parsed = Kustomization::from_file(&document)?;
        debug!("Resolving references of '{}'", document.display());

        self.closure.dirs.push(dir.to_path_buf());

        for reference in parsed.references() {
            if is_remote_reference(&reference.path) {
                debug!(
                    "Skipping remote reference '{}' in '{}'",
                    reference.entry,
                    document.display()
                );
                continue;
            }

            let resolved = normalize(&dir.join(&reference.path));

            if reference.kind == ReferenceKind::Resource
                && resolved.is_dir()
                && kustomization::is_kustomization_dir(&resolved)
            {
                self.queue.push_back(resolved);
            } else if resolved.is_file() {
                self.add_file(resolved, Staged::Copy);
            } else {
                return Err(Error::Resolution {
                    kustomization: document,
                    entry: reference.entry,
                    path: resolved,
                });
            }
        }

        let changed = parsed.rewrite_paths(|path| {
            let path = Path::new(path);
            if !path.is_absolute() {
                return None;
            }
            let relative = relative_to(&normalize(path), dir)?;
            if relative.as_os_str().is_empty() {
                return Some(".".to_string());
            }
            Some(relative.to_string_lossy().into_owned())
        });

        if changed {
            info!(
                "Rewriting absolute paths in '{}'",
                document.display()
            );
            let content = parsed.to_yaml()?.into_bytes();
            self.closure
                .files
                .insert(document, Staged::Rewritten(content));
        } else {
            self.add_file(document, Staged::Copy);
        }

        Ok(())
    }

    fn add_file(&mut self, source: PathBuf, staged: Staged) {
        match self.closure.files.entry(source) {
            Entry::Vacant(entry) => {
                entry.insert(staged);
            }
            Entry::Occupied(entry) => {
                debug!("'{}' is already scheduled", entry.key().display());
            }
        }
    }
}

fn build_plan(source_dir: &Path) -> Result<Plan> {
    let source_dir = fs::canonicalize(source_dir).map_err(|_| Error::KustomizationNotFound {
        dir: source_dir.to_path_buf(),
    })?;
    let root_document = kustomization::find(&source_dir)?;

    let Closure { dirs, files } = Planner::new(source_dir.clone()).run()?;

    let staging_root = common_ancestor(
        dirs.iter()
            .map(PathBuf::as_path)
            .chain(files.keys().filter_map(|f| f.parent())),
    )
    .unwrap_or_else(|| source_dir.clone());

    if staging_root != source_dir {
        info!(
            "Staging from '{}' to include references outside '{}'",
            staging_root.display(),
            source_dir.display()
        );
    }

    let mut entries: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
    let mut rewritten = HashMap::new();

    for (source, staged) in files {
        let dst = source
            .strip_prefix(&staging_root)
            .map(Path::to_path_buf)
            .map_err(|_| Error::Path {
                message: format!(
                    "'{}' is outside the staging root '{}'",
                    source.display(),
                    staging_root.display()
                ),
            })?;

        if let Staged::Rewritten(content) = staged {
            rewritten.insert(dst.clone(), content);
        }
        entries.insert(dst, source);
    }

    let kustomization = root_document
        .strip_prefix(&staging_root)
        .map(Path::to_path_buf)
        .map_err(|_| Error::Path {
            message: format!(
                "'{}' is outside the staging root '{}'",
                root_document.display(),
                staging_root.display()
            ),
        })?;

    Ok(Plan {
        mapping: MirrorMapping {
            staging_root,
            kustomization,
            entries,
        },
        rewritten,
    })
}

/// Resolve the file closure of the kustomization in `source_dir` without
/// writing anything.
pub fn plan(source_dir: &Path) -> Result<MirrorMapping> {
    Ok(build_plan(source_dir)?.mapping)
}

/// Mirror the kustomization in `source_dir` into `destination`.
///
/// Every file the kustomization transitively depends on is copied to the
/// same path relative to the staging root; see [`MirrorMapping`] for where
/// the root document landed. Files referenced more than once are copied
/// once.
pub fn mirror<F>(source_dir: &Path, destination: &mut F) -> Result<MirrorMapping>
where
    F: WritableFs + ?Sized,
{
    let Plan {
        mapping,
        mut rewritten,
    } = build_plan(source_dir)?;

    for (dst, src) in mapping.iter() {
        let content = match rewritten.remove(dst) {
            Some(content) => content,
            None => fs::read(src).map_err(|e| Error::Filesystem {
                message: format!("Failed to read file '{}': {}", src.display(), e),
            })?,
        };
        destination.write_file(dst, &content)?;
        debug!("Mirrored '{}' to '{}'", src.display(), dst.display());
    }

    info!(
        "Mirrored {} file(s) from '{}'",
        mapping.len(),
        mapping.staging_root().display()
    );

    Ok(mapping)
}
