//! Delegated tool execution errors.

use super::error_code::{self, ConformErrorCode};

/// Errors raised when an external tool cannot be run or its output
/// cannot be understood. Scoped to one (file, rule) evaluation.
#[derive(Debug, thiserror::Error)]
pub enum ToolExecutionError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} timed out after {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("{program} exited with {code:?} and no parseable output: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Unparseable output from {program}: {message}")]
    UnparseableOutput { program: String, message: String },

    #[error("IO error talking to {program}: {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
}

impl ToolExecutionError {
    /// The program the error concerns.
    pub fn program(&self) -> &str {
        match self {
            Self::Spawn { program, .. }
            | Self::Timeout { program, .. }
            | Self::Failed { program, .. }
            | Self::UnparseableOutput { program, .. }
            | Self::Io { program, .. } => program,
        }
    }
}

impl ConformErrorCode for ToolExecutionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::TOOL_TIMEOUT,
            _ => error_code::TOOL_EXECUTION_ERROR,
        }
    }
}
