//! Source loading with size, binary and encoding checks.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use conform_core::constants::BINARY_SNIFF_LEN;
use conform_core::errors::{DetectionError, ScanError};

use super::file_type::FileType;
use crate::syntax::{self, Outline};

/// One file loaded for validation.
///
/// The syntax outline is built on first use and shared by every rule
/// evaluated against the file.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    display_path: String,
    file_type: FileType,
    content: String,
    outline: OnceLock<Result<Option<Outline>, String>>,
}

impl SourceFile {
    pub fn new(
        path: impl Into<PathBuf>,
        display_path: impl Into<String>,
        file_type: FileType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            display_path: display_path.into(),
            file_type,
            content: content.into(),
            outline: OnceLock::new(),
        }
    }

    /// In-memory file whose path and display path are the same.
    pub fn from_source(display_path: &str, file_type: FileType, content: &str) -> Self {
        Self::new(display_path, display_path, file_type, content)
    }

    /// Path on disk, as handed to external tools.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path as it appears in violations.
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    pub fn lines(&self) -> Vec<&str> {
        self.content.lines().collect()
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Functions and classes of the file. `Ok(None)` for file types
    /// without a grammar.
    pub fn outline(&self) -> Result<Option<&Outline>, DetectionError> {
        let cached = self.outline.get_or_init(|| {
            syntax::build_outline(
                &self.display_path,
                self.file_type,
                self.extension(),
                &self.content,
            )
            .map_err(|e| match e {
                DetectionError::Parse { message, .. } => message,
                other => other.to_string(),
            })
        });
        match cached {
            Ok(outline) => Ok(outline.as_ref()),
            Err(message) => Err(DetectionError::Parse {
                path: self.display_path.clone(),
                message: message.clone(),
            }),
        }
    }
}

/// Read a file for validation.
///
/// Fails with a `ScanError` when the file is missing, unreadable, larger
/// than `max_file_size`, contains NUL bytes in its first
/// [`BINARY_SNIFF_LEN`] bytes, or is not UTF-8.
pub fn read_source(
    path: &Path,
    display_path: &str,
    file_type: FileType,
    max_file_size: u64,
) -> Result<SourceFile, ScanError> {
    let metadata =
        std::fs::metadata(path).map_err(|e| ScanError::from_io(path.to_path_buf(), e))?;
    if !metadata.is_file() {
        return Err(ScanError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if metadata.len() > max_file_size {
        return Err(ScanError::MaxFileSizeExceeded {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_file_size,
        });
    }

    let mut bytes = Vec::with_capacity(metadata.len() as usize);
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| ScanError::from_io(path.to_path_buf(), e))?;

    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return Err(ScanError::BinaryContent {
            path: path.to_path_buf(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|_| ScanError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;

    Ok(SourceFile::new(path, display_path, file_type, content))
}

/// Path as shown in reports: relative to `root` when possible, with
/// forward slashes and no leading `./`.
pub fn display_path(path: &Path, root: Option<&Path>) -> String {
    let relative = root
        .and_then(|r| path.strip_prefix(r).ok())
        .unwrap_or(path);
    let text = relative.to_string_lossy().replace('\\', "/");
    match text.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_strips_root_and_dot() {
        let root = Path::new("/repo");
        assert_eq!(display_path(Path::new("/repo/src/a.py"), Some(root)), "src/a.py");
        assert_eq!(display_path(Path::new("./src/a.py"), None), "src/a.py");
        assert_eq!(display_path(Path::new("/elsewhere/b.py"), Some(root)), "/elsewhere/b.py");
    }

    #[test]
    fn binary_and_oversized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("blob.py");
        std::fs::write(&bin, b"abc\0def").unwrap();
        assert!(matches!(
            read_source(&bin, "blob.py", FileType::Python, 1024),
            Err(ScanError::BinaryContent { .. })
        ));

        let big = dir.path().join("big.py");
        std::fs::write(&big, "x = 1\n".repeat(100)).unwrap();
        assert!(matches!(
            read_source(&big, "big.py", FileType::Python, 10),
            Err(ScanError::MaxFileSizeExceeded { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("latin1.py");
        std::fs::write(&file, [b'#', b' ', 0xE9, b'\n']).unwrap();
        assert!(matches!(
            read_source(&file, "latin1.py", FileType::Python, 1024),
            Err(ScanError::InvalidEncoding { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.py");
        assert!(matches!(
            read_source(&file, "gone.py", FileType::Python, 1024),
            Err(ScanError::NotFound { .. })
        ));
    }
}
