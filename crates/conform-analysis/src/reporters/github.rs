//! GitHub Actions reporter: workflow-command annotations, one per line.

use conform_core::errors::ReportError;

use super::Reporter;
use crate::report::ComplianceReport;
use crate::rules::Severity;

#[derive(Debug, Default)]
pub struct GitHubReporter;

impl GitHubReporter {
    fn command(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "notice",
        }
    }
}

/// Escape an annotation message.
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape an annotation property value.
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

impl Reporter for GitHubReporter {
    fn name(&self) -> &'static str {
        "github"
    }

    fn render(&self, report: &ComplianceReport) -> Result<String, ReportError> {
        let mut lines = Vec::with_capacity(report.violations.len() + report.notes.len() + 1);

        for v in &report.violations {
            let mut props = format!("file={}", escape_property(&v.file_path));
            if let Some(line) = v.line_number {
                props.push_str(&format!(",line={line}"));
            }
            props.push_str(&format!(",title={}", escape_property(&v.rule_id)));
            let message = match &v.suggested_fix {
                Some(fix) => format!("{} (fix: {fix})", v.message),
                None => v.message.clone(),
            };
            lines.push(format!(
                "::{} {props}::{}",
                Self::command(v.severity),
                escape_data(&message)
            ));
        }

        for note in &report.notes {
            let props = match &note.file_path {
                Some(file) => format!(" file={}", escape_property(file)),
                None => String::new(),
            };
            lines.push(format!(
                "::notice{props}::{}",
                escape_data(&format!("{}: {}", note.kind.as_str(), note.message))
            ));
        }

        for (gate, passed) in &report.gate_results {
            if !passed {
                lines.push(format!(
                    "::error title={}::{}",
                    escape_property("quality gate"),
                    escape_data(&format!("gate '{gate}' failed"))
                ));
            }
        }

        lines.push(format!(
            "conform: status {}, {} violation(s), score {}/100",
            report.status,
            report.violations.len(),
            report.compliance_score()
        ));
        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaping() {
        assert_eq!(escape_data("a%b\nc"), "a%25b%0Ac");
        assert_eq!(escape_property("src/a,b:c"), "src/a%2Cb%3Ac");
    }
}
