//! JSON reporter and the report document schema.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use conform_core::errors::ReportError;

use super::Reporter;
use crate::report::{ComplianceReport, Note, ScopeSummary, Status};
use crate::rules::Violation;

/// The serialized form of a [`ComplianceReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportDocument {
    pub status: Status,
    pub summary: Summary,
    pub violations: Vec<Violation>,
    pub gate_results: BTreeMap<String, bool>,
    pub notes: Vec<Note>,
    pub metadata: MetadataDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Summary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub compliance_score: u32,
    /// Status is not `fail` and every gate passed.
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetadataDocument {
    /// Wall-clock duration; present only when timing is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    pub tool_versions: BTreeMap<String, String>,
    pub scope: ScopeSummary,
    pub cancelled: bool,
    pub files_checked: usize,
    pub suppressed: usize,
}

impl ReportDocument {
    pub fn from_report(report: &ComplianceReport, include_timing: bool) -> Self {
        let meta = &report.metadata;
        Self {
            status: report.status,
            summary: Summary {
                total: report.violations.len(),
                errors: report.error_count(),
                warnings: report.warning_count(),
                infos: report.info_count(),
                compliance_score: report.compliance_score(),
                passed: report.passed(),
            },
            violations: report.violations.clone(),
            gate_results: report.gate_results.clone(),
            notes: report.notes.clone(),
            metadata: MetadataDocument {
                duration_ms: include_timing.then(|| meta.duration.as_millis() as u64),
                tool_versions: meta.tool_versions.clone(),
                scope: meta.scope.clone(),
                cancelled: meta.cancelled,
                files_checked: meta.files_checked,
                suppressed: meta.suppressed,
            },
        }
    }
}

/// JSON reporter. Timing is excluded unless `include_timing` is set, so
/// identical runs render byte-identical output.
#[derive(Debug, Default)]
pub struct JsonReporter {
    pub include_timing: bool,
}

impl JsonReporter {
    pub fn with_timing() -> Self {
        Self {
            include_timing: true,
        }
    }
}

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, report: &ComplianceReport) -> Result<String, ReportError> {
        let document = ReportDocument::from_report(report, self.include_timing);
        serde_json::to_string_pretty(&document).map_err(|e| ReportError::Serialization(e.to_string()))
    }
}

/// Parse a rendered JSON report back into its document.
pub fn parse_json(source: &str) -> Result<ReportDocument, ReportError> {
    serde_json::from_str(source).map_err(|e| ReportError::Serialization(e.to_string()))
}

/// JSON Schema of [`ReportDocument`].
pub fn schema_json() -> Result<String, ReportError> {
    let schema = schemars::schema_for!(ReportDocument);
    serde_json::to_string_pretty(&schema).map_err(|e| ReportError::Serialization(e.to_string()))
}
