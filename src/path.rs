//! Path manipulation utilities for kustomize-mirror

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Lexically normalize a path, folding `.` and `..` components.
///
/// Unlike `fs::canonicalize` this does not touch the filesystem, so it works
/// for paths that do not exist yet. A `..` that would climb above the start
/// of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Validate a destination path: it must be relative and stay inside the
/// destination root once normalized.
///
/// Returns the normalized path.
pub fn confine(path: &Path) -> Result<PathBuf> {
    if path.has_root() || path.is_absolute() {
        return Err(Error::Path {
            message: format!("Destination path '{}' must be relative", path.display()),
        });
    }

    let normalized = normalize(path);
    if normalized
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(Error::Path {
            message: format!(
                "Destination path '{}' escapes the destination root",
                path.display()
            ),
        });
    }
    if normalized.as_os_str().is_empty() {
        return Err(Error::Path {
            message: format!("Destination path '{}' is empty", path.display()),
        });
    }

    Ok(normalized)
}

/// Deepest directory containing every given path.
///
/// All paths are expected to be absolute and normalized.
pub fn common_ancestor<'a, I>(paths: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut paths = paths.into_iter();
    let mut ancestor = paths.next()?.to_path_buf();

    for path in paths {
        while !path.starts_with(&ancestor) {
            if !ancestor.pop() {
                return None;
            }
        }
    }

    Some(ancestor)
}

/// Relative path leading from directory `base` to `target`.
///
/// Both paths are expected to be absolute.
pub fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    pathdiff::diff_paths(target, base)
}

/// Whether a kustomization entry points at a remote location rather than a
/// local path.
///
/// Recognizes URLs with a scheme (`https://`, `git::`, `ssh://`), scp-style
/// git addresses (`git@github.com:org/repo`) and the `github.com/org/repo`
/// shorthand accepted by kustomize.
pub fn is_remote_reference(entry: &str) -> bool {
    if entry.starts_with("git@") || entry.starts_with("git::") {
        return true;
    }
    if entry.starts_with("github.com/") || entry.starts_with("gitlab.com/") {
        return true;
    }
    match Url::parse(entry) {
        // A single letter scheme is a Windows drive letter, not a URL.
        Ok(url) => url.scheme().len() > 1 && entry.contains("://"),
        Err(_) => false,
    }
}
