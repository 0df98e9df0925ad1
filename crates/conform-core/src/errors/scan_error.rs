//! File access errors.

use std::path::PathBuf;

use super::error_code::{self, ConformErrorCode};

/// Errors raised while collecting or reading files in scope.
///
/// A file that cannot be read never aborts a run; the orchestrator turns
/// these into report notes.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Binary content in {path}")]
    BinaryContent { path: PathBuf },

    #[error("{path} is not valid UTF-8")]
    InvalidEncoding { path: PathBuf },

    #[error("File too large: {path} ({size} bytes, max {max})")]
    MaxFileSizeExceeded { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Git error: {message}")]
    Git { message: String },
}

impl ScanError {
    /// Classify an IO error for `path` into the matching variant.
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

impl ConformErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Walk { .. } | Self::Git { .. } => error_code::SCAN_ERROR,
            _ => error_code::UNREADABLE_FILE,
        }
    }
}
