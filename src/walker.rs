//! Package tree traversal.
//!
//! Directories are visited depth-first in pre-order, entries sorted by file name, so every run
//! over the same tree sees packages in the same order.

use std::fs;
use std::path::{Component, Path, PathBuf};

use cuegen_core::lang::conventions::{CUE_EXTENSION, RUST_EXTENSION};

use crate::errors::{GenError, GenResult};

/// One directory holding Rust or CUE sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDir {
    pub path: PathBuf,
    /// `/`-separated path relative to the root (`""` for the root).
    pub key: String,
    pub rust_files: Vec<PathBuf>,
    pub cue_files: Vec<PathBuf>,
}

/// Walk `root`, calling `visit` for every directory with sources.
///
/// Directories named in `skip` are pruned with their subtree. Symlinks are not followed. The
/// first I/O or visitor error stops the walk.
#[tracing::instrument(skip_all, fields(root = %root.display()))]
pub fn walk<F>(root: &Path, skip: &[String], mut visit: F) -> GenResult<()>
where
    F: FnMut(&PackageDir) -> GenResult<()>,
{
    if is_skipped(root, skip) {
        tracing::debug!("root directory is excluded");
        return Ok(());
    }
    walk_dir(root, root, skip, &mut visit)
}

fn walk_dir<F>(root: &Path, dir: &Path, skip: &[String], visit: &mut F) -> GenResult<()>
where
    F: FnMut(&PackageDir) -> GenResult<()>,
{
    let walk_err = |source| GenError::Walk {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(walk_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(walk_err)?;
    entries.sort_by_key(|e| e.file_name());

    let mut rust_files = Vec::new();
    let mut cue_files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in entries {
        let file_type = entry.file_type().map_err(walk_err)?;
        let path = entry.path();
        if file_type.is_dir() {
            if is_skipped(&path, skip) {
                tracing::debug!(dir = %path.display(), "skipping excluded directory");
                continue;
            }
            subdirs.push(path);
        } else if file_type.is_file() {
            match path.extension().and_then(|e| e.to_str()) {
                Some(RUST_EXTENSION) => rust_files.push(path),
                Some(CUE_EXTENSION) => cue_files.push(path),
                _ => {}
            }
        }
    }

    if !rust_files.is_empty() || !cue_files.is_empty() {
        let package = PackageDir {
            path: dir.to_path_buf(),
            key: package_key(root, dir),
            rust_files,
            cue_files,
        };
        tracing::debug!(package = %package.key, "visiting package");
        visit(&package)?;
    }

    for sub in subdirs {
        walk_dir(root, &sub, skip, visit)?;
    }
    Ok(())
}

fn is_skipped(dir: &Path, skip: &[String]) -> bool {
    dir.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| skip.iter().any(|s| s == name))
}

/// Relative path of `dir` under `root`, joined with `/`.
pub fn package_key(root: &Path, dir: &Path) -> String {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn keys(root: &Path, skip: &[&str]) -> Vec<String> {
        let skip: Vec<String> = skip.iter().map(|s| s.to_string()).collect();
        let mut seen = Vec::new();
        walk(root, &skip, |dir| {
            seen.push(dir.key.clone());
            Ok(())
        })
        .unwrap();
        seen
    }

    #[test]
    fn test_preorder_sorted_walk() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "strings/lib.rs");
        touch(tmp.path(), "encoding/json/json.rs");
        touch(tmp.path(), "encoding/json/schema.cue");
        touch(tmp.path(), "encoding/base64/lib.rs");
        touch(tmp.path(), "empty/README.md");
        touch(tmp.path(), "top.rs");
        assert_eq!(
            keys(tmp.path(), &[]),
            vec!["", "encoding/base64", "encoding/json", "strings"]
        );
    }

    #[test]
    fn test_skip_prunes_subtree() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "math/lib.rs");
        touch(tmp.path(), "math/testdata/lib.rs");
        touch(tmp.path(), "testdata/nested/lib.rs");
        assert_eq!(keys(tmp.path(), &["testdata"]), vec!["math"]);
    }

    #[test]
    fn test_files_are_split_by_extension() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "list/b.rs");
        touch(tmp.path(), "list/a.rs");
        touch(tmp.path(), "list/list.cue");
        let mut dirs = Vec::new();
        walk(tmp.path(), &[], |dir| {
            dirs.push(dir.clone());
            Ok(())
        })
        .unwrap();
        let names: Vec<String> = dirs[0]
            .rust_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.rs", "b.rs"]);
        assert_eq!(dirs[0].cue_files.len(), 1);
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let err = walk(&tmp.path().join("nope"), &[], |_| Ok(())).unwrap_err();
        assert!(matches!(err, GenError::Walk { .. }));
    }
}
