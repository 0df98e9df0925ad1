//! DetectorSet: one detector per kind.

use std::sync::Arc;
use std::time::Duration;

use conform_core::errors::DetectionError;

use super::delegated::DelegatedDetector;
use super::metrics::MetricRegistry;
use super::pattern::PatternDetector;
use super::threshold::ThresholdDetector;
use super::traits::Detector;
use crate::rules::{DetectorKind, Rule, Violation};
use crate::scanner::SourceFile;

/// Detectors keyed by the closed [`DetectorKind`] enum.
#[derive(Clone)]
pub struct DetectorSet {
    threshold: Arc<dyn Detector>,
    pattern: Arc<dyn Detector>,
    delegated: Arc<dyn Detector>,
}

impl DetectorSet {
    /// The built-in detectors.
    pub fn new(metrics: Arc<MetricRegistry>, tool_timeout: Duration) -> Self {
        Self {
            threshold: Arc::new(ThresholdDetector::new(metrics)),
            pattern: Arc::new(PatternDetector::new()),
            delegated: Arc::new(DelegatedDetector::new(tool_timeout)),
        }
    }

    /// Replace the detector for `detector.kind()`.
    pub fn with_detector(mut self, detector: Arc<dyn Detector>) -> Self {
        match detector.kind() {
            DetectorKind::Threshold => self.threshold = detector,
            DetectorKind::Pattern => self.pattern = detector,
            DetectorKind::Delegated => self.delegated = detector,
        }
        self
    }

    pub fn get(&self, kind: DetectorKind) -> &dyn Detector {
        match kind {
            DetectorKind::Threshold => self.threshold.as_ref(),
            DetectorKind::Pattern => self.pattern.as_ref(),
            DetectorKind::Delegated => self.delegated.as_ref(),
        }
    }

    /// Run the detector matching the rule's kind.
    pub fn detect(&self, file: &SourceFile, rule: &Rule) -> Result<Vec<Violation>, DetectionError> {
        self.get(rule.detector_kind()).detect(file, rule)
    }
}

impl std::fmt::Debug for DetectorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorSet").finish_non_exhaustive()
    }
}
