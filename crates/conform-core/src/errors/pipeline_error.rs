//! Top-level pipeline errors.

use super::error_code::{self, ConformErrorCode};
use super::{ConfigError, DetectionError, ReportError, ScanError};

/// Errors that abort a validation run or a CLI command.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Detection error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Validation cancelled")]
    Cancelled,
}

impl ConformErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Scan(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
