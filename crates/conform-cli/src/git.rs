//! File sets from git: staged files and files changed since a revision.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use conform_core::errors::ScanError;
use git2::{Delta, Diff, Repository};

fn git_error(e: git2::Error) -> ScanError {
    ScanError::Git {
        message: e.message().to_string(),
    }
}

/// Open the repository containing `path`.
pub fn open(path: &Path) -> Result<Repository, ScanError> {
    Repository::discover(path).map_err(git_error)
}

fn workdir(repo: &Repository) -> Result<PathBuf, ScanError> {
    repo.workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| ScanError::Git {
            message: "bare repositories have no working tree".to_string(),
        })
}

/// Added, copied, modified and renamed files in `diff`, as absolute paths.
fn changed_files(diff: &Diff<'_>, root: &Path) -> BTreeSet<PathBuf> {
    diff.deltas()
        .filter(|delta| delta.status() != Delta::Deleted)
        .filter_map(|delta| delta.new_file().path().map(|p| root.join(p)))
        .collect()
}

/// Files staged in the index relative to `HEAD`. In a repository without
/// commits every staged file counts.
pub fn staged_files(path: &Path) -> Result<BTreeSet<PathBuf>, ScanError> {
    let repo = open(path)?;
    let root = workdir(&repo)?;
    let head_tree = repo.head().ok().and_then(|head| head.peel_to_tree().ok());
    let index = repo.index().map_err(git_error)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
        .map_err(git_error)?;
    let files = changed_files(&diff, &root);
    tracing::debug!(files = files.len(), "staged files");
    Ok(files)
}

/// Files that differ between `rev` and the working tree, staged or not.
/// `@{push}` falls back to `@{upstream}` where the former cannot be resolved.
pub fn changed_since(path: &Path, rev: &str) -> Result<BTreeSet<PathBuf>, ScanError> {
    let repo = open(path)?;
    let root = workdir(&repo)?;
    let object = match repo.revparse_single(rev) {
        Ok(object) => object,
        Err(e) if rev.contains("@{push}") => {
            let fallback = rev.replace("@{push}", "@{upstream}");
            tracing::debug!(rev, %fallback, error = %e.message(), "retrying with upstream");
            repo.revparse_single(&fallback).map_err(git_error)?
        }
        Err(e) => return Err(git_error(e)),
    };
    let tree = object.peel_to_tree().map_err(git_error)?;
    let diff = repo
        .diff_tree_to_workdir_with_index(Some(&tree), None)
        .map_err(git_error)?;
    let files = changed_files(&diff, &root);
    tracing::debug!(rev, files = files.len(), "changed files");
    Ok(files)
}

/// The hooks directory of the repository containing `path`: `core.hooksPath`
/// when set (relative values resolve against the working tree), otherwise
/// `.git/hooks`.
pub fn hooks_dir(path: &Path) -> Result<PathBuf, ScanError> {
    let repo = open(path)?;
    let configured = repo
        .config()
        .map_err(git_error)?
        .get_path("core.hooksPath")
        .ok();
    Ok(match configured {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => repo.workdir().unwrap_or_else(|| repo.path()).join(dir),
        None => repo.path().join("hooks"),
    })
}
