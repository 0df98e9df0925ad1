//! Pattern detector: identifiers that do not match a naming regex.

use conform_core::errors::DetectionError;

use super::traits::{kind_mismatch, Detector};
use crate::rules::{DetectorConfig, DetectorKind, PatternTarget, Rule, TemplateVars, Violation};
use crate::scanner::SourceFile;

#[derive(Debug, Default)]
pub struct PatternDetector;

impl PatternDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for PatternDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Pattern
    }

    fn detect(&self, file: &SourceFile, rule: &Rule) -> Result<Vec<Violation>, DetectionError> {
        let DetectorConfig::Pattern(params) = &rule.detector else {
            return Err(kind_mismatch(DetectorKind::Pattern, rule));
        };
        let Some(outline) = file.outline()? else {
            return Ok(Vec::new());
        };

        let mut identifiers: Vec<(PatternTarget, &str, u32)> = Vec::new();
        for target in &params.targets {
            match target {
                PatternTarget::Functions => identifiers.extend(
                    outline
                        .functions
                        .iter()
                        .filter(|f| !f.is_anonymous())
                        .map(|f| (*target, f.name.as_str(), f.line)),
                ),
                PatternTarget::Classes => identifiers.extend(
                    outline
                        .classes
                        .iter()
                        .map(|c| (*target, c.name.as_str(), c.line)),
                ),
            }
        }
        identifiers.sort_by_key(|(_, _, line)| *line);

        let violations = identifiers
            .into_iter()
            .filter(|(_, name, _)| !name.is_empty() && !params.pattern.is_match(name))
            .map(|(target, name, line)| {
                let vars = TemplateVars::new()
                    .set("identifier", name)
                    .set("name", name)
                    .set("target", target.noun())
                    .set("pattern", params.pattern.as_str());
                rule.violation(file.display_path(), Some(line), rule.severity, vars)
            })
            .collect();
        Ok(violations)
    }
}
