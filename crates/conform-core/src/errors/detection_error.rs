//! Detection errors.

use super::error_code::{self, ConformErrorCode};
use super::ToolExecutionError;

/// Errors that can occur while a detector evaluates one rule against one file.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error(transparent)]
    Tool(#[from] ToolExecutionError),

    #[error("Detector for {expected} rules cannot evaluate rule {rule} ({actual})")]
    KindMismatch {
        rule: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Metric {metric} failed: {message}")]
    Metric { metric: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

impl ConformErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Tool(e) => e.error_code(),
            _ => error_code::DETECTION_ERROR,
        }
    }
}
