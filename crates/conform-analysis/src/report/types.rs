//! Report types.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rules::{Severity, Violation};

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
    Warning,
}

impl Status {
    /// `Fail` when any violation is blocking, `Warning` when any
    /// violation remains, `Pass` otherwise.
    pub fn derive(violations: &[Violation], strict: bool) -> Status {
        if violations.iter().any(|v| v.is_blocking(strict)) {
            Status::Fail
        } else if violations.is_empty() {
            Status::Pass
        } else {
            Status::Warning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an infrastructure note is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    UnknownFileType,
    UnreadableFile,
    ToolExecution,
    Detection,
    GateSkipped,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownFileType => "unknown_file_type",
            Self::UnreadableFile => "unreadable_file",
            Self::ToolExecution => "tool_execution",
            Self::Detection => "detection",
            Self::GateSkipped => "gate_skipped",
        }
    }
}

/// An Info-severity remark about the run itself. Notes never affect status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Note {
    pub kind: NoteKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub message: String,
}

impl Note {
    pub fn new(kind: NoteKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Info,
            file_path: None,
            rule_id: None,
            message: message.into(),
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn sort_key(&self) -> (Option<&str>, Option<&str>, NoteKind, &str) {
        (
            self.file_path.as_deref(),
            self.rule_id.as_deref(),
            self.kind,
            &self.message,
        )
    }
}

/// The scope a report was produced for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScopeSummary {
    /// Number of paths in the scope, classified or not.
    pub files: usize,
    /// Requested principles; empty means all.
    pub principles: Vec<String>,
    pub strict: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportMetadata {
    pub duration: Duration,
    /// Tool name to version string, including conform itself.
    pub tool_versions: BTreeMap<String, String>,
    pub scope: ScopeSummary,
    pub cancelled: bool,
    pub files_checked: usize,
    /// Violations dropped by inline suppression comments.
    pub suppressed: usize,
}

/// The result of one validation run.
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub status: Status,
    /// Sorted by file, rule, line and message.
    pub violations: Vec<Violation>,
    pub gate_results: BTreeMap<String, bool>,
    pub notes: Vec<Note>,
    pub metadata: ReportMetadata,
}

impl ComplianceReport {
    /// An empty passing report.
    pub fn empty() -> Self {
        Self {
            status: Status::Pass,
            violations: Vec::new(),
            gate_results: BTreeMap::new(),
            notes: Vec::new(),
            metadata: ReportMetadata::default(),
        }
    }

    /// True when the status is not `Fail` and every evaluated gate passed.
    pub fn passed(&self) -> bool {
        self.status != Status::Fail && self.gate_results.values().all(|passed| *passed)
    }

    /// True when a delegated tool could not be run or understood.
    pub fn has_tool_failures(&self) -> bool {
        self.notes.iter().any(|n| n.kind == NoteKind::ToolExecution)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// `max(0, 100 - 10 * errors - 5 * warnings)`.
    pub fn compliance_score(&self) -> u32 {
        let penalty = 10 * self.error_count() + 5 * self.warning_count();
        100usize.saturating_sub(penalty) as u32
    }

    /// Violations grouped by file, in report order.
    pub fn by_file(&self) -> Vec<(&str, Vec<&Violation>)> {
        let mut groups: Vec<(&str, Vec<&Violation>)> = Vec::new();
        for violation in &self.violations {
            match groups.last_mut() {
                Some((file, group)) if *file == violation.file_path => group.push(violation),
                _ => groups.push((&violation.file_path, vec![violation])),
            }
        }
        groups
    }
}

impl Default for ComplianceReport {
    fn default() -> Self {
        Self::empty()
    }
}
