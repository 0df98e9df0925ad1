//! Detector trait.

use conform_core::errors::DetectionError;

use crate::rules::{DetectorKind, Rule, Violation};
use crate::scanner::SourceFile;

/// A detection strategy for one [`DetectorKind`].
///
/// Violations are returned as data; `Err` is reserved for failures to
/// evaluate the rule at all.
pub trait Detector: Send + Sync {
    fn kind(&self) -> DetectorKind;

    fn detect(&self, file: &SourceFile, rule: &Rule) -> Result<Vec<Violation>, DetectionError>;
}

/// Error for a rule routed to a detector of another kind.
pub(crate) fn kind_mismatch(expected: DetectorKind, rule: &Rule) -> DetectionError {
    DetectionError::KindMismatch {
        rule: rule.id.clone(),
        expected: expected.as_str(),
        actual: rule.detector_kind().as_str(),
    }
}
