//! Text reporter: human-readable terminal output.

use std::fmt::Write;

use conform_core::errors::ReportError;

use super::Reporter;
use crate::report::{ComplianceReport, Status};
use crate::rules::Severity;

pub struct TextReporter {
    pub use_color: bool,
}

impl TextReporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn prefix(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "[ERROR]",
            Severity::Warning => "[WARN]",
            Severity::Info => "[INFO]",
        }
    }

    fn color_start(&self, severity: Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[31m",   // red
            Severity::Warning => "\x1b[33m", // yellow
            Severity::Info => "\x1b[36m",    // cyan
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }

    fn status_color(&self, status: Status) -> &'static str {
        match status {
            Status::Pass if self.use_color => "\x1b[32m",
            Status::Fail => self.color_start(Severity::Error),
            Status::Warning => self.color_start(Severity::Warning),
            Status::Pass => "",
        }
    }

    /// Infallible rendering; `String` as a `fmt::Write` sink cannot fail.
    pub fn render_string(&self, report: &ComplianceReport) -> String {
        let mut out = String::new();
        let ce = self.color_end();

        for (file, violations) in report.by_file() {
            let _ = writeln!(out, "{file}");
            for v in violations {
                let location = match v.line_number {
                    Some(line) => format!("{file}:{line}"),
                    None => file.to_string(),
                };
                let _ = writeln!(
                    out,
                    "  {}{}{} {} {}: {}",
                    self.color_start(v.severity),
                    Self::prefix(v.severity),
                    ce,
                    location,
                    v.rule_id,
                    v.message
                );
                if let Some(fix) = &v.suggested_fix {
                    let _ = writeln!(out, "      fix: {fix}");
                }
            }
            out.push('\n');
        }

        if !report.notes.is_empty() {
            out.push_str("Notes:\n");
            for note in &report.notes {
                let _ = write!(out, "  [INFO] {}", note.kind.as_str());
                if let Some(file) = &note.file_path {
                    let _ = write!(out, " {file}");
                }
                if let Some(rule) = &note.rule_id {
                    let _ = write!(out, " ({rule})");
                }
                let _ = writeln!(out, ": {}", note.message);
            }
            out.push('\n');
        }

        if !report.gate_results.is_empty() {
            out.push_str("Gates:\n");
            for (name, passed) in &report.gate_results {
                let verdict = if *passed { "PASS" } else { "FAIL" };
                let _ = writeln!(out, "  {name}: {verdict}");
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "Summary: {} violation(s) ({} error, {} warning, {} info) in {} file(s) checked, score {}/100",
            report.violations.len(),
            report.error_count(),
            report.warning_count(),
            report.info_count(),
            report.metadata.files_checked,
            report.compliance_score()
        );
        if report.metadata.suppressed > 0 {
            let _ = writeln!(out, "Suppressed: {}", report.metadata.suppressed);
        }
        if report.metadata.cancelled {
            out.push_str("Run cancelled: results are partial\n");
        }
        let _ = writeln!(
            out,
            "Status: {}{}{}",
            self.status_color(report.status),
            report.status.as_str().to_uppercase(),
            ce
        );
        out
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Reporter for TextReporter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, report: &ComplianceReport) -> Result<String, ReportError> {
        Ok(self.render_string(report))
    }
}
