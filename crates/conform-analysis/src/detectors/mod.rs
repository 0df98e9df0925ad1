//! Detectors: the strategies that turn a (file, rule) pair into violations.
//!
//! Three kinds exist: threshold (metric over a limit), pattern (identifier
//! naming) and delegated (external tool). The [`DetectorSet`] dispatches
//! on the closed [`DetectorKind`](crate::rules::DetectorKind) enum; any
//! slot can be replaced with a custom implementation.

pub mod delegated;
pub mod metrics;
pub mod pattern;
pub mod set;
pub mod threshold;
pub mod traits;

pub use delegated::DelegatedDetector;
pub use metrics::{Measurement, Metric, MetricRegistry};
pub use pattern::PatternDetector;
pub use set::DetectorSet;
pub use threshold::ThresholdDetector;
pub use traits::Detector;
