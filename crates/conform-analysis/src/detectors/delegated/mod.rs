//! Delegated detector: runs an external tool on the file and maps its
//! findings to violations.

pub mod adapters;
pub mod process;

use std::time::Duration;

use conform_core::constants::DEFAULT_TOOL_TIMEOUT_MS;
use conform_core::errors::{DetectionError, ToolExecutionError};

use super::traits::{kind_mismatch, Detector};
use crate::rules::template::format_number;
use crate::rules::{DelegatedParams, DetectorConfig, DetectorKind, Rule, TemplateVars, Violation};
use crate::scanner::SourceFile;
use adapters::parse_output;
use process::{run_tool, ToolOutput};

/// Placeholder replaced by the file path in a rule's `args`.
pub const FILE_PLACEHOLDER: &str = "{file}";

const MAX_STDERR_CHARS: usize = 500;

pub struct DelegatedDetector {
    default_timeout: Duration,
}

impl DelegatedDetector {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }

    /// Arguments for one invocation: `{file}` substituted, or the path
    /// appended when no argument mentions it.
    pub fn build_args(params: &DelegatedParams, file: &SourceFile) -> Vec<String> {
        let path = file.path().to_string_lossy();
        let mut substituted = false;
        let mut args: Vec<String> = params
            .args
            .iter()
            .map(|arg| {
                if arg.contains(FILE_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(FILE_PLACEHOLDER, &path)
                } else {
                    arg.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(path.into_owned());
        }
        args
    }

    fn interpret(
        params: &DelegatedParams,
        output: &ToolOutput,
    ) -> Result<Vec<adapters::ToolFinding>, ToolExecutionError> {
        let failed = || ToolExecutionError::Failed {
            program: params.command.clone(),
            code: output.code,
            stderr: output.stderr.trim().chars().take(MAX_STDERR_CHARS).collect(),
        };

        if output.stdout.trim().is_empty() {
            return if output.success() {
                Ok(Vec::new())
            } else {
                Err(failed())
            };
        }
        match parse_output(params.adapter, &output.stdout, params.max) {
            Ok(findings) => Ok(findings),
            Err(_) if !output.success() => Err(failed()),
            Err(message) => Err(ToolExecutionError::UnparseableOutput {
                program: params.command.clone(),
                message,
            }),
        }
    }
}

impl Default for DelegatedDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TOOL_TIMEOUT_MS))
    }
}

impl Detector for DelegatedDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Delegated
    }

    fn detect(&self, file: &SourceFile, rule: &Rule) -> Result<Vec<Violation>, DetectionError> {
        let DetectorConfig::Delegated(params) = &rule.detector else {
            return Err(kind_mismatch(DetectorKind::Delegated, rule));
        };
        let args = Self::build_args(params, file);
        let timeout = params.timeout.unwrap_or(self.default_timeout);

        tracing::debug!(
            rule = %rule.id,
            program = %params.command,
            file = %file.display_path(),
            timeout_ms = timeout.as_millis() as u64,
            "running delegated tool"
        );
        let output = run_tool(&params.command, &args, timeout)?;
        let findings = Self::interpret(params, &output)?;

        Ok(findings
            .into_iter()
            .map(|finding| {
                let severity = match finding.severity {
                    Some(tool_severity) if params.severity_from_tool => tool_severity,
                    _ => rule.severity,
                };
                let mut vars = TemplateVars::new()
                    .set("code", &finding.code)
                    .set("message", &finding.message)
                    .set("name", finding.name.as_deref().unwrap_or(&finding.code))
                    .set("tool", &params.command);
                if let Some(value) = finding.value {
                    vars = vars.set("value", format_number(value));
                }
                if let Some(max) = params.max {
                    vars = vars.set("max", format_number(max));
                }
                rule.violation(file.display_path(), finding.line, severity, vars)
            })
            .collect())
    }
}
