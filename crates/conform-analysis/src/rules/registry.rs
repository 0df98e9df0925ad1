//! RuleSet: the loaded, immutable rule registry.

use std::collections::BTreeSet;
use std::path::Path;

use conform_core::errors::ConfigError;
use rustc_hash::FxHashMap;

use super::loader::{parse_rules, RuleFormat};
use super::types::Rule;
use crate::scanner::FileType;

/// All rules of a project, in declaration order. Rule ids are unique.
///
/// A `RuleSet` is a plain value: reloading builds a new one, and several
/// validators can each hold their own.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    by_id: FxHashMap<String, usize>,
    principles: Vec<String>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule source in the given format.
    pub fn load(source: &str, format: RuleFormat) -> Result<Self, ConfigError> {
        Self::from_rules(parse_rules(source, format)?)
    }

    /// Read and parse a rule file; the format follows the extension.
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;
        let rules = parse_rules(&source, RuleFormat::from_path(path)).map_err(|e| match e {
            ConfigError::ParseError { message, .. } => ConfigError::ParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        let set = Self::from_rules(rules)?;
        tracing::debug!(path = %path.display(), rules = set.len(), "loaded rule set");
        Ok(set)
    }

    /// Build a set from already compiled rules, rejecting duplicate ids.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self, ConfigError> {
        let mut by_id = FxHashMap::default();
        let mut principles: Vec<String> = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            if by_id.insert(rule.id.clone(), index).is_some() {
                return Err(ConfigError::DuplicateRuleId {
                    id: rule.id.clone(),
                });
            }
            if !principles.contains(&rule.principle) {
                principles.push(rule.principle.clone());
            }
        }
        Ok(Self {
            rules,
            by_id,
            principles,
        })
    }

    /// Enabled rules for `file_type` whose principle is in `principles`
    /// (empty = all), in declaration order.
    pub fn rules_for(&self, file_type: FileType, principles: &BTreeSet<String>) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .filter(|r| r.applies_to(file_type))
            .filter(|r| principles.is_empty() || principles.contains(&r.principle))
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.by_id.get(id).map(|&i| &self.rules[i])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Principle names in declaration order.
    pub fn principles(&self) -> &[String] {
        &self.principles
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
