//! Rule file parsing and compilation.
//!
//! A rule file maps principle names to lists of rule objects:
//!
//! ```yaml
//! solid:
//!   - id: SRP001
//!     detector_kind: threshold
//!     file_types: [py]
//!     parameters: { metric: cyclomatic_complexity, max: 10 }
//! naming:
//!   - id: NAME001
//!     detector_kind: pattern
//!     parameters: { pattern: "^[a-z_][a-z0-9_]*$" }
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use conform_core::errors::ConfigError;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::types::*;
use crate::scanner::FileType;

/// Serialization format of a rule source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFormat {
    Yaml,
    Json,
    Toml,
}

impl RuleFormat {
    /// Format from the file extension. Anything unrecognised is read as YAML.
    pub fn from_path(path: &Path) -> RuleFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => RuleFormat::Json,
            Some("toml") => RuleFormat::Toml,
            _ => RuleFormat::Yaml,
        }
    }
}

/// Principles in declaration order, each with its raw rule objects.
struct RuleDocument {
    principles: Vec<(String, Vec<Value>)>,
}

impl<'de> Deserialize<'de> for RuleDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RuleDocumentVisitor)
    }
}

struct RuleDocumentVisitor;

impl<'de> Visitor<'de> for RuleDocumentVisitor {
    type Value = RuleDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of principle names to lists of rules")
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(RuleDocument {
            principles: Vec::new(),
        })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut principles: Vec<(String, Vec<Value>)> = Vec::new();
        while let Some(principle) = map.next_key::<String>()? {
            let rules: Option<Vec<Value>> = map.next_value()?;
            let rules = rules.unwrap_or_default();
            match principles.iter_mut().find(|(name, _)| *name == principle) {
                Some((_, existing)) => existing.extend(rules),
                None => principles.push((principle, rules)),
            }
        }
        Ok(RuleDocument { principles })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileTypesField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawRule {
    id: Option<String>,
    #[serde(alias = "kind")]
    detector_kind: Option<String>,
    file_types: Option<FileTypesField>,
    #[serde(alias = "params")]
    parameters: Option<Map<String, Value>>,
    severity: Option<String>,
    #[serde(alias = "message")]
    message_template: Option<String>,
    suggested_fix: Option<String>,
    #[serde(default)]
    exclude: Vec<String>,
    enabled: Option<bool>,
}

/// Parse `source` into compiled rules, principle by principle in declaration order.
pub(crate) fn parse_rules(source: &str, format: RuleFormat) -> Result<Vec<Rule>, ConfigError> {
    let blank = source.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || (format != RuleFormat::Json && line.starts_with('#'))
    });
    if blank {
        return Ok(Vec::new());
    }

    let parse_error = |message: String| ConfigError::ParseError {
        path: "<rules>".to_string(),
        message,
    };
    let document: RuleDocument = match format {
        RuleFormat::Yaml => serde_yaml::from_str(source).map_err(|e| parse_error(e.to_string()))?,
        RuleFormat::Json => serde_json::from_str(source).map_err(|e| parse_error(e.to_string()))?,
        RuleFormat::Toml => toml::from_str(source).map_err(|e| parse_error(e.to_string()))?,
    };

    let mut rules = Vec::new();
    for (principle, raw_rules) in document.principles {
        for (index, value) in raw_rules.into_iter().enumerate() {
            rules.push(compile_rule(&principle, index, value)?);
        }
    }
    Ok(rules)
}

fn compile_rule(principle: &str, index: usize, value: Value) -> Result<Rule, ConfigError> {
    if !value.is_object() {
        return Err(ConfigError::InvalidValue {
            field: format!("{principle}[{index}]"),
            message: "rule must be a mapping".to_string(),
        });
    }
    let raw: RawRule = serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
        field: format!("{principle}[{index}]"),
        message: e.to_string(),
    })?;

    let id = raw
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ConfigError::MissingField {
            principle: principle.to_string(),
            index,
            field: "id",
        })?;
    let kind_name = raw.detector_kind.ok_or_else(|| ConfigError::MissingField {
        principle: principle.to_string(),
        index,
        field: "detector_kind",
    })?;
    let kind = DetectorKind::parse(&kind_name).ok_or_else(|| ConfigError::UnknownDetectorKind {
        rule: id.clone(),
        kind: kind_name.clone(),
    })?;

    let parameters = raw.parameters.unwrap_or_default();
    let detector = match kind {
        DetectorKind::Threshold => DetectorConfig::Threshold(compile_threshold(&id, &parameters)?),
        DetectorKind::Pattern => DetectorConfig::Pattern(compile_pattern(&id, &parameters)?),
        DetectorKind::Delegated => DetectorConfig::Delegated(compile_delegated(&id, &parameters)?),
    };

    let file_types = compile_file_types(&id, raw.file_types)?;

    let severity = match raw.severity {
        None => Severity::Error,
        Some(value) => Severity::parse(&value).ok_or_else(|| {
            invalid(&id, "severity", format!("'{value}' is not error, warning or info"))
        })?,
    };

    let exclude = raw
        .exclude
        .iter()
        .map(|pattern| {
            glob::Pattern::new(pattern)
                .map_err(|e| invalid(&id, "exclude", format!("'{pattern}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Rule {
        message_template: raw
            .message_template
            .unwrap_or_else(|| kind.default_template().to_string()),
        id,
        principle: principle.to_string(),
        file_types,
        detector,
        parameters,
        severity,
        suggested_fix: raw.suggested_fix,
        exclude,
        enabled: raw.enabled.unwrap_or(true),
    })
}

fn invalid(rule: &str, parameter: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        rule: rule.to_string(),
        parameter: parameter.to_string(),
        message: message.into(),
    }
}

fn compile_file_types(
    rule: &str,
    field: Option<FileTypesField>,
) -> Result<FileTypeFilter, ConfigError> {
    let entries = match field {
        None => return Ok(FileTypeFilter::Any),
        Some(FileTypesField::One(value)) => vec![value],
        Some(FileTypesField::Many(values)) => values,
    };
    if entries.is_empty() || entries.iter().any(|e| e.trim() == "*") {
        return Ok(FileTypeFilter::Any);
    }
    let mut types = BTreeSet::new();
    for entry in entries {
        let file_type =
            FileType::from_tag_or_name(&entry).ok_or_else(|| ConfigError::UnknownFileType {
                rule: rule.to_string(),
                tag: entry.clone(),
            })?;
        types.insert(file_type);
    }
    Ok(FileTypeFilter::Only(types))
}

fn compile_threshold(rule: &str, params: &Map<String, Value>) -> Result<ThresholdParams, ConfigError> {
    let metric = match params.get("metric") {
        None | Some(Value::Null) => "cyclomatic_complexity".to_string(),
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        Some(other) => return Err(invalid(rule, "metric", format!("expected a metric name, got {other}"))),
    };
    let max = params
        .get("max")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid(rule, "max", "a numeric max is required"))?;
    Ok(ThresholdParams { metric, max })
}

fn compile_pattern(rule: &str, params: &Map<String, Value>) -> Result<PatternParams, ConfigError> {
    let source = params
        .get("pattern")
        .or_else(|| params.get("regex"))
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(rule, "pattern", "a regex string is required"))?;
    let pattern = Regex::new(source).map_err(|e| invalid(rule, "pattern", e.to_string()))?;

    let targets = match params.get("targets").or_else(|| params.get("target")) {
        None | Some(Value::Null) => vec![PatternTarget::Functions],
        Some(value) => {
            let names: Vec<&str> = match value {
                Value::String(s) => vec![s.as_str()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .ok_or_else(|| invalid(rule, "targets", "entries must be strings"))
                    })
                    .collect::<Result<_, _>>()?,
                other => return Err(invalid(rule, "targets", format!("unexpected value {other}"))),
            };
            let mut targets = Vec::new();
            for name in names {
                let target = PatternTarget::parse(name).ok_or_else(|| {
                    invalid(rule, "targets", format!("'{name}' is not functions or classes"))
                })?;
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
            if targets.is_empty() {
                return Err(invalid(rule, "targets", "at least one target is required"));
            }
            targets
        }
    };
    Ok(PatternParams { pattern, targets })
}

fn compile_delegated(rule: &str, params: &Map<String, Value>) -> Result<DelegatedParams, ConfigError> {
    let command = params
        .get("command")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| invalid(rule, "command", "a command is required"))?
        .to_string();

    let args = match params.get("args") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(invalid(rule, "args", format!("unexpected argument {other}"))),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => return Err(invalid(rule, "args", format!("expected a list, got {other}"))),
    };

    let adapter = match params.get("adapter").and_then(Value::as_str) {
        Some(name) => ToolAdapter::parse(name)
            .ok_or_else(|| invalid(rule, "adapter", format!("unknown adapter '{name}'")))?,
        None => {
            let stem = Path::new(&command)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            ToolAdapter::parse(stem).ok_or_else(|| {
                invalid(rule, "adapter", "required when the command is not ruff, bandit, radon or eslint")
            })?
        }
    };

    let timeout = match params.get("timeout_ms") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_u64() {
            Some(ms) if ms > 0 => Some(Duration::from_millis(ms)),
            _ => return Err(invalid(rule, "timeout_ms", "must be a positive integer")),
        },
    };

    let max = match params.get("max") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_f64()
                .ok_or_else(|| invalid(rule, "max", "must be numeric"))?,
        ),
    };

    let severity_from_tool = match params.get("severity_from_tool") {
        None | Some(Value::Null) => false,
        Some(value) => value
            .as_bool()
            .ok_or_else(|| invalid(rule, "severity_from_tool", "must be true or false"))?,
    };

    Ok(DelegatedParams {
        command,
        args,
        adapter,
        timeout,
        max,
        severity_from_tool,
    })
}
