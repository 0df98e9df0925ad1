//! Errors surfaced by CLI commands. Every variant exits with code 2.

use std::path::PathBuf;

use conform_core::errors::{
    error_code, ConfigError, ConformErrorCode, PipelineError, ReportError, ScanError,
};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Pipeline(e.into())
    }
}

impl From<ScanError> for CliError {
    fn from(e: ScanError) -> Self {
        Self::Pipeline(e.into())
    }
}

impl From<ReportError> for CliError {
    fn from(e: ReportError) -> Self {
        Self::Pipeline(e.into())
    }
}

impl ConformErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Pipeline(e) => e.error_code(),
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}
