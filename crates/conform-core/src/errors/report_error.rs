//! Report rendering and persistence errors.

use std::path::PathBuf;

use super::error_code::{self, ConformErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Report serialization failed: {0}")]
    Serialization(String),

    #[error("Unknown report format: {0}")]
    UnknownFormat(String),

    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConformErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
