//! `conform rules`: list the loaded rule set.

use std::path::PathBuf;

use conform_analysis::rules::RuleSet;
use conform_core::config::{CliOverrides, ConformConfig};
use conform_core::constants::EXIT_PASS;
use conform_core::errors::ReportError;
use serde_json::json;

use super::current_dir;
use crate::error::CliError;

pub fn run(config: Option<PathBuf>, rules: Option<PathBuf>, as_json: bool) -> Result<i32, CliError> {
    let root = current_dir()?;
    let overrides = CliOverrides {
        rules_path: rules.map(|p| p.display().to_string()),
        ..CliOverrides::default()
    };
    let config = ConformConfig::load_with_file(&root, config.as_deref(), Some(&overrides))?;
    let set = RuleSet::load_path(&root.join(config.validation.effective_rules_path()))?;

    if as_json {
        let listing: Vec<_> = set
            .iter()
            .map(|rule| {
                json!({
                    "id": rule.id,
                    "principle": rule.principle,
                    "detector_kind": rule.detector_kind().as_str(),
                    "severity": rule.severity,
                    "file_types": rule.file_types.tags(),
                    "parameters": rule.parameters,
                    "enabled": rule.enabled,
                })
            })
            .collect();
        let out = serde_json::to_string_pretty(&listing)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        println!("{out}");
        return Ok(EXIT_PASS);
    }

    for principle in set.principles() {
        println!("{principle}");
        for rule in set.iter().filter(|r| &r.principle == principle) {
            println!(
                "  {:<12} {:<10} {:<8} [{}]{}",
                rule.id,
                rule.detector_kind().as_str(),
                rule.severity.as_str(),
                rule.file_types.tags().join(", "),
                if rule.enabled { "" } else { " (disabled)" }
            );
        }
    }
    println!("{} rule(s)", set.len());
    Ok(EXIT_PASS)
}
