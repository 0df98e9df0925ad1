//! Threshold detector: one violation per measurement above `max`.

use std::sync::Arc;

use conform_core::errors::DetectionError;

use super::metrics::MetricRegistry;
use super::traits::{kind_mismatch, Detector};
use crate::rules::template::format_number;
use crate::rules::{DetectorConfig, DetectorKind, Rule, TemplateVars, Violation};
use crate::scanner::SourceFile;

pub struct ThresholdDetector {
    metrics: Arc<MetricRegistry>,
}

impl ThresholdDetector {
    pub fn new(metrics: Arc<MetricRegistry>) -> Self {
        Self { metrics }
    }
}

impl Detector for ThresholdDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Threshold
    }

    fn detect(&self, file: &SourceFile, rule: &Rule) -> Result<Vec<Violation>, DetectionError> {
        let DetectorConfig::Threshold(params) = &rule.detector else {
            return Err(kind_mismatch(DetectorKind::Threshold, rule));
        };
        let metric = self
            .metrics
            .get(&params.metric)
            .ok_or_else(|| DetectionError::Metric {
                metric: params.metric.clone(),
                message: "no metric registered under this name".to_string(),
            })?;

        let violations = metric
            .measure(file)?
            .into_iter()
            .filter(|m| m.value > params.max)
            .map(|m| {
                let vars = TemplateVars::new()
                    .set("name", &m.subject)
                    .set("metric", &params.metric)
                    .set("value", format_number(m.value))
                    .set("max", format_number(params.max));
                rule.violation(file.display_path(), m.line, rule.severity, vars)
            })
            .collect();
        Ok(violations)
    }
}
