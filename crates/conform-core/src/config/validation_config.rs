//! Validation run configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the `[validation]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Path to the rule file, relative to the project root.
    pub rules_path: Option<String>,
    /// Worker threads for file evaluation. 0 = number of CPUs.
    pub threads: Option<usize>,
    /// Timeout for one delegated tool invocation.
    pub tool_timeout_ms: Option<u64>,
    /// Files larger than this are skipped with a note.
    pub max_file_size: Option<u64>,
    /// Treat every violation as blocking.
    pub strict: Option<bool>,
    /// Principles to check. Empty = all.
    #[serde(default)]
    pub principles: Vec<String>,
}

impl ValidationConfig {
    pub fn effective_rules_path(&self) -> &str {
        self.rules_path
            .as_deref()
            .unwrap_or(constants::DEFAULT_RULES_PATH)
    }

    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(constants::DEFAULT_THREADS)
    }

    pub fn effective_tool_timeout_ms(&self) -> u64 {
        self.tool_timeout_ms
            .unwrap_or(constants::DEFAULT_TOOL_TIMEOUT_MS)
    }

    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(constants::DEFAULT_MAX_FILE_SIZE)
    }

    pub fn effective_strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }
}
