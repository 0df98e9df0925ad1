//! Configuration errors.

use super::error_code::{self, ConformErrorCode};

/// Errors raised while loading the project config or the rule set.
/// Always fatal: a broken rule set is never partially applied.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Rule #{index} of principle '{principle}' is missing required field '{field}'")]
    MissingField {
        principle: String,
        index: usize,
        field: &'static str,
    },

    #[error("Rule {rule}: unrecognized detector_kind '{kind}'")]
    UnknownDetectorKind { rule: String, kind: String },

    #[error("Duplicate rule id: {id}")]
    DuplicateRuleId { id: String },

    #[error("Rule {rule}: invalid parameter '{parameter}': {message}")]
    InvalidParameter {
        rule: String,
        parameter: String,
        message: String,
    },

    #[error("Rule {rule}: unknown file type '{tag}'")]
    UnknownFileType { rule: String, tag: String },

    #[error("Rule {rule}: no metric registered under '{metric}'")]
    UnknownMetric { rule: String, metric: String },
}

impl ConfigError {
    /// A failed read of `path`: `FileNotFound` for a missing file,
    /// `Unreadable` for any other failure.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let path = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound { path },
            _ => Self::Unreadable { path, source },
        }
    }
}

impl ConformErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
