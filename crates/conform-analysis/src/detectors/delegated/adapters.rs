//! Parsers for external tool output.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::rules::{Severity, ToolAdapter};

/// Default radon complexity ceiling (rank B upper bound).
pub const DEFAULT_RADON_MAX: f64 = 10.0;

/// One issue reported by a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolFinding {
    pub line: Option<u32>,
    pub code: String,
    pub message: String,
    pub severity: Option<Severity>,
    /// Measured value, for tools that report one (radon).
    pub value: Option<f64>,
    /// Subject of the finding, when the tool names one.
    pub name: Option<String>,
}

/// Parse `stdout` according to `adapter`. `Err` carries a description of
/// why the output could not be understood.
pub fn parse_output(
    adapter: ToolAdapter,
    stdout: &str,
    max: Option<f64>,
) -> Result<Vec<ToolFinding>, String> {
    match adapter {
        ToolAdapter::Ruff => parse_ruff(stdout),
        ToolAdapter::Bandit => parse_bandit(stdout),
        ToolAdapter::Radon => parse_radon(stdout, max.unwrap_or(DEFAULT_RADON_MAX)),
        ToolAdapter::Eslint => parse_eslint(stdout),
        ToolAdapter::Lines => parse_lines(stdout),
    }
}

#[derive(Deserialize)]
struct RuffDiagnostic {
    code: Option<String>,
    message: String,
    location: Option<RuffLocation>,
}

#[derive(Deserialize)]
struct RuffLocation {
    row: u32,
}

fn parse_ruff(stdout: &str) -> Result<Vec<ToolFinding>, String> {
    let diagnostics: Vec<RuffDiagnostic> =
        serde_json::from_str(stdout).map_err(|e| format!("ruff json: {e}"))?;
    Ok(diagnostics
        .into_iter()
        .map(|d| ToolFinding {
            line: d.location.map(|l| l.row),
            code: d.code.unwrap_or_else(|| "ruff".to_string()),
            message: d.message,
            severity: None,
            value: None,
            name: None,
        })
        .collect())
}

#[derive(Deserialize)]
struct BanditReport {
    #[serde(default)]
    results: Vec<BanditResult>,
}

#[derive(Deserialize)]
struct BanditResult {
    test_id: String,
    issue_text: String,
    line_number: Option<u32>,
    issue_severity: Option<String>,
}

fn parse_bandit(stdout: &str) -> Result<Vec<ToolFinding>, String> {
    let report: BanditReport =
        serde_json::from_str(stdout).map_err(|e| format!("bandit json: {e}"))?;
    Ok(report
        .results
        .into_iter()
        .map(|r| ToolFinding {
            line: r.line_number,
            code: r.test_id,
            message: r.issue_text,
            severity: r.issue_severity.as_deref().map(|s| match s.to_ascii_uppercase().as_str() {
                "HIGH" => Severity::Error,
                "MEDIUM" => Severity::Warning,
                _ => Severity::Info,
            }),
            value: None,
            name: None,
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RadonFile {
    Blocks(Vec<RadonBlock>),
    Failed { error: String },
}

#[derive(Deserialize)]
struct RadonBlock {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    lineno: u32,
    complexity: f64,
    rank: Option<String>,
    classname: Option<String>,
}

fn parse_radon(stdout: &str, max: f64) -> Result<Vec<ToolFinding>, String> {
    let files: std::collections::BTreeMap<String, RadonFile> =
        serde_json::from_str(stdout).map_err(|e| format!("radon json: {e}"))?;
    let mut findings = Vec::new();
    for (path, file) in files {
        let blocks = match file {
            RadonFile::Blocks(blocks) => blocks,
            RadonFile::Failed { error } => return Err(format!("radon failed on {path}: {error}")),
        };
        // Class entries repeat their methods; methods are reported on their own.
        for block in blocks.into_iter().filter(|b| b.kind != "class") {
            if block.complexity <= max {
                continue;
            }
            let name = match block.classname {
                Some(class) => format!("{class}.{}", block.name),
                None => block.name,
            };
            findings.push(ToolFinding {
                line: Some(block.lineno),
                code: format!("CC{}", block.rank.as_deref().unwrap_or("")),
                message: format!(
                    "{name} has cyclomatic complexity {} (max {})",
                    crate::rules::template::format_number(block.complexity),
                    crate::rules::template::format_number(max),
                ),
                severity: None,
                value: Some(block.complexity),
                name: Some(name),
            });
        }
    }
    Ok(findings)
}

#[derive(Deserialize)]
struct EslintFile {
    #[serde(default)]
    messages: Vec<EslintMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    rule_id: Option<String>,
    severity: u8,
    message: String,
    line: Option<u32>,
}

fn parse_eslint(stdout: &str) -> Result<Vec<ToolFinding>, String> {
    let files: Vec<EslintFile> =
        serde_json::from_str(stdout).map_err(|e| format!("eslint json: {e}"))?;
    Ok(files
        .into_iter()
        .flat_map(|f| f.messages)
        .map(|m| ToolFinding {
            line: m.line,
            code: m.rule_id.unwrap_or_else(|| "eslint".to_string()),
            message: m.message,
            severity: Some(if m.severity >= 2 {
                Severity::Error
            } else {
                Severity::Warning
            }),
            value: None,
            name: None,
        })
        .collect())
}

/// `path:line[:col]: message` and the optional leading `CODE123` token.
fn line_patterns() -> Option<&'static (Regex, Regex)> {
    static PATTERNS: OnceLock<Option<(Regex, Regex)>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            let line =
                Regex::new(r"^(?:(?P<path>[^:]*):)?(?P<line>\d+)(?::\d+)?:\s*(?P<message>.*)$").ok()?;
            let code = Regex::new(r"^(?P<code>[A-Z][A-Z0-9_-]*[0-9])\s+(?P<rest>.*)$").ok()?;
            Some((line, code))
        })
        .as_ref()
}

/// `path:line[:col]: [CODE] message`, one finding per matching line.
/// Output with no matching line at all is unparseable.
fn parse_lines(stdout: &str) -> Result<Vec<ToolFinding>, String> {
    let (line_re, code_re) = line_patterns().ok_or("line patterns failed to compile")?;
    let mut findings = Vec::new();
    let mut unmatched = 0usize;
    for line in stdout.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some(caps) = line_re.captures(line) else {
            unmatched += 1;
            continue;
        };
        let message = caps.name("message").map_or("", |m| m.as_str());
        let (code, message) = match code_re.captures(message) {
            Some(c) => (
                c.name("code").map_or("", |m| m.as_str()).to_string(),
                c.name("rest").map_or("", |m| m.as_str()).to_string(),
            ),
            None => ("finding".to_string(), message.to_string()),
        };
        findings.push(ToolFinding {
            line: caps.name("line").and_then(|m| m.as_str().parse().ok()),
            code,
            message,
            severity: None,
            value: None,
            name: None,
        });
    }
    if findings.is_empty() && unmatched > 0 {
        return Err(format!("{unmatched} line(s) not in path:line: message form"));
    }
    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ruff_json() {
        let out = r#"[{"code":"F401","message":"`os` imported but unused","location":{"row":1,"column":8},"filename":"a.py"}]"#;
        let findings = parse_output(ToolAdapter::Ruff, out, None).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "F401");
        assert_eq!(findings[0].line, Some(1));
    }

    #[test]
    fn bandit_severity_maps() {
        let out = r#"{"errors":[],"results":[
            {"test_id":"B602","issue_text":"shell=True","line_number":4,"issue_severity":"HIGH"},
            {"test_id":"B101","issue_text":"assert used","line_number":9,"issue_severity":"LOW"}]}"#;
        let findings = parse_output(ToolAdapter::Bandit, out, None).unwrap();
        assert_eq!(findings[0].severity, Some(Severity::Error));
        assert_eq!(findings[1].severity, Some(Severity::Info));
    }

    #[test]
    fn radon_filters_by_max_and_skips_classes() {
        let out = r#"{"a.py":[
            {"type":"class","name":"C","lineno":1,"complexity":14,"rank":"C","methods":[]},
            {"type":"method","name":"run","lineno":2,"complexity":13,"rank":"C","classname":"C"},
            {"type":"function","name":"small","lineno":20,"complexity":3,"rank":"A"}]}"#;
        let findings = parse_output(ToolAdapter::Radon, out, Some(10.0)).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name.as_deref(), Some("C.run"));
        assert_eq!(findings[0].value, Some(13.0));
    }

    #[test]
    fn radon_error_entry_is_unparseable() {
        let out = r#"{"a.py":{"error":"invalid syntax (<unknown>, line 1)"}}"#;
        assert!(parse_output(ToolAdapter::Radon, out, None).is_err());
    }

    #[test]
    fn eslint_json() {
        let out = r#"[{"filePath":"/x/a.js","messages":[{"ruleId":"no-unused-vars","severity":2,"message":"'x' is unused","line":3}]}]"#;
        let findings = parse_output(ToolAdapter::Eslint, out, None).unwrap();
        assert_eq!(findings[0].code, "no-unused-vars");
        assert_eq!(findings[0].severity, Some(Severity::Error));
    }

    #[test]
    fn plain_lines() {
        let out = "src/a.sh:3:1: SC2086 Double quote to prevent globbing\nnoise\n7: bare message\n";
        let findings = parse_output(ToolAdapter::Lines, out, None).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].code, "SC2086");
        assert_eq!(findings[0].line, Some(3));
        assert_eq!(findings[1].code, "finding");
        assert_eq!(findings[1].line, Some(7));
    }

    #[test]
    fn garbage_is_unparseable() {
        assert!(parse_output(ToolAdapter::Ruff, "not json", None).is_err());
        assert!(parse_output(ToolAdapter::Lines, "nothing useful here", None).is_err());
    }
}
