//! Expansion of command-line paths into a file set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use conform_core::errors::ScanError;
use ignore::WalkBuilder;

/// Expand files and directories into a sorted, de-duplicated file set.
///
/// Files are taken as given, even when they do not exist, so that the
/// validator can report them as unreadable. Directories are walked
/// recursively honouring `.gitignore`, `.ignore` and hidden-file rules.
pub fn expand_paths<P: AsRef<Path>>(paths: &[P]) -> Result<BTreeSet<PathBuf>, ScanError> {
    let mut files = BTreeSet::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            walk_dir(path, &mut files)?;
        } else {
            files.insert(path.to_path_buf());
        }
    }
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut BTreeSet<PathBuf>) -> Result<(), ScanError> {
    let walker = WalkBuilder::new(dir)
        .hidden(true)
        .git_ignore(true)
        .git_exclude(true)
        .require_git(false)
        .follow_links(false)
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| ScanError::Walk {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            files.insert(entry.into_path());
        }
    }
    tracing::debug!(dir = %dir.display(), files = files.len(), "expanded directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_respect_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::create_dir_all(dir.path().join("build")).unwrap();
        std::fs::write(dir.path().join(".gitignore"), "build/\n").unwrap();
        std::fs::write(dir.path().join("src/a.py"), "x = 1\n").unwrap();
        std::fs::write(dir.path().join("build/gen.py"), "x = 1\n").unwrap();

        let files = expand_paths(&[dir.path()]).unwrap();
        assert!(files.contains(&dir.path().join("src/a.py")));
        assert!(!files.contains(&dir.path().join("build/gen.py")));
    }

    #[test]
    fn explicit_files_are_kept_even_if_missing() {
        let files = expand_paths(&["does/not/exist.py", "does/not/exist.py"]).unwrap();
        assert_eq!(files.len(), 1);
    }
}
