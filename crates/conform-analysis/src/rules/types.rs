//! Core types for the rule registry.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::template::{self, TemplateVars};
use crate::scanner::FileType;

/// Severity levels for violations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Case-insensitive parse; `warn` is accepted for `warning`.
    pub fn parse(value: &str) -> Option<Severity> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Severity::Error),
            "warning" | "warn" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three detection strategies. Closed: dispatch is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Threshold,
    Pattern,
    Delegated,
}

impl DetectorKind {
    pub fn parse(value: &str) -> Option<DetectorKind> {
        match value.trim().to_ascii_lowercase().as_str() {
            "threshold" => Some(Self::Threshold),
            "pattern" => Some(Self::Pattern),
            "delegated" => Some(Self::Delegated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Pattern => "pattern",
            Self::Delegated => "delegated",
        }
    }

    /// Message used when a rule declares no `message_template`.
    pub fn default_template(&self) -> &'static str {
        match self {
            Self::Threshold => "{name} has {metric} {value} (max {max})",
            Self::Pattern => "{target} name '{identifier}' does not match {pattern}",
            Self::Delegated => "{code}: {message}",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which file types a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTypeFilter {
    /// `*` or omitted.
    Any,
    Only(BTreeSet<FileType>),
}

impl FileTypeFilter {
    pub fn matches(&self, file_type: FileType) -> bool {
        match self {
            Self::Any => true,
            Self::Only(types) => types.contains(&file_type),
        }
    }

    /// Tags for display, `*` for the wildcard.
    pub fn tags(&self) -> Vec<&'static str> {
        match self {
            Self::Any => vec!["*"],
            Self::Only(types) => types.iter().map(FileType::tag).collect(),
        }
    }
}

/// What a pattern rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternTarget {
    Functions,
    Classes,
}

impl PatternTarget {
    pub fn parse(value: &str) -> Option<PatternTarget> {
        match value.trim().to_ascii_lowercase().as_str() {
            "functions" | "function" | "methods" | "method" => Some(Self::Functions),
            "classes" | "class" | "types" | "type" => Some(Self::Classes),
            _ => None,
        }
    }

    /// Singular noun for messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Functions => "function",
            Self::Classes => "class",
        }
    }
}

/// Output formats understood by delegated detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolAdapter {
    /// `ruff check --output-format json`
    Ruff,
    /// `bandit -f json`
    Bandit,
    /// `radon cc -j`
    Radon,
    /// `eslint -f json`
    Eslint,
    /// `path:line[:col]: message` per line.
    Lines,
}

impl ToolAdapter {
    pub fn parse(value: &str) -> Option<ToolAdapter> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ruff" => Some(Self::Ruff),
            "bandit" => Some(Self::Bandit),
            "radon" => Some(Self::Radon),
            "eslint" => Some(Self::Eslint),
            "lines" => Some(Self::Lines),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ruff => "ruff",
            Self::Bandit => "bandit",
            Self::Radon => "radon",
            Self::Eslint => "eslint",
            Self::Lines => "lines",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdParams {
    pub metric: String,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct PatternParams {
    pub pattern: Regex,
    pub targets: Vec<PatternTarget>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DelegatedParams {
    pub command: String,
    pub args: Vec<String>,
    pub adapter: ToolAdapter,
    /// Per-rule override of the validator's tool timeout.
    pub timeout: Option<Duration>,
    /// Complexity ceiling for the radon adapter.
    pub max: Option<f64>,
    /// Use the tool's own severity when it reports one.
    pub severity_from_tool: bool,
}

/// Parameters validated and compiled at load time.
#[derive(Debug, Clone)]
pub enum DetectorConfig {
    Threshold(ThresholdParams),
    Pattern(PatternParams),
    Delegated(DelegatedParams),
}

impl DetectorConfig {
    pub fn kind(&self) -> DetectorKind {
        match self {
            Self::Threshold(_) => DetectorKind::Threshold,
            Self::Pattern(_) => DetectorKind::Pattern,
            Self::Delegated(_) => DetectorKind::Delegated,
        }
    }
}

/// A named check belonging to a principle. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub principle: String,
    pub file_types: FileTypeFilter,
    pub detector: DetectorConfig,
    /// Parameters as written in the rule file.
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub severity: Severity,
    pub message_template: String,
    pub suggested_fix: Option<String>,
    pub exclude: Vec<glob::Pattern>,
    pub enabled: bool,
}

impl Rule {
    pub fn detector_kind(&self) -> DetectorKind {
        self.detector.kind()
    }

    pub fn applies_to(&self, file_type: FileType) -> bool {
        self.file_types.matches(file_type)
    }

    /// True when `display_path` matches one of the rule's `exclude` globs.
    pub fn is_excluded(&self, display_path: &str) -> bool {
        self.exclude.iter().any(|p| p.matches(display_path))
    }

    /// Build a violation, rendering the message and fix templates.
    /// `rule_id`, `principle`, `file` and `line` are always available.
    pub fn violation(
        &self,
        file_path: &str,
        line: Option<u32>,
        severity: Severity,
        vars: TemplateVars,
    ) -> Violation {
        let mut vars = vars
            .set_default("rule_id", &self.id)
            .set_default("principle", &self.principle)
            .set_default("file", file_path);
        if let Some(line) = line {
            vars = vars.set_default("line", line);
        }
        Violation {
            rule_id: self.id.clone(),
            principle: self.principle.clone(),
            severity,
            file_path: file_path.to_string(),
            line_number: line,
            message: template::render(&self.message_template, &vars),
            suggested_fix: self
                .suggested_fix
                .as_deref()
                .map(|fix| template::render(fix, &vars)),
        }
    }
}

/// A single rule failure at a location. Violations are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub rule_id: String,
    pub principle: String,
    pub severity: Severity,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Violation {
    /// Blocking violations fail the run: errors, or anything in strict mode.
    pub fn is_blocking(&self, strict: bool) -> bool {
        strict || self.severity == Severity::Error
    }

    /// Key for the deterministic report order.
    pub fn sort_key(&self) -> (&str, &str, Option<u32>, &str) {
        (
            &self.file_path,
            &self.rule_id,
            self.line_number,
            &self.message,
        )
    }
}
