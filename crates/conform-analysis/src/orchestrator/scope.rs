//! What one validation run covers.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Constructed per invocation and passed by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationScope {
    pub file_paths: BTreeSet<PathBuf>,
    /// Principles to check; empty means all.
    pub principles_to_check: BTreeSet<String>,
    /// Treat every violation as blocking.
    pub strict_mode: bool,
    /// Externally measured coverage percentage for the coverage gate.
    pub coverage: Option<f64>,
}

impl ValidationScope {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            file_paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_principles<I, S>(mut self, principles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.principles_to_check = principles.into_iter().map(Into::into).collect();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = Some(coverage);
        self
    }
}
