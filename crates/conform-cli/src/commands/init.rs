//! `conform init`: write a starter config and rule file.

use std::fs;
use std::path::{Path, PathBuf};

use conform_core::constants::{CONFIG_FILE_NAME, DEFAULT_RULES_PATH, EXIT_PASS};

use crate::error::CliError;

const DEFAULT_CONFIG: &str = r#"# conform project configuration

[validation]
rules_path = ".conform/rules.yaml"
# threads = 0            # 0 = one per CPU
# tool_timeout_ms = 5000
# max_file_size = 1048576
# strict = false
# principles = []        # empty = all

[output]
format = "text"
# color = true
# report_dir = ".conform/reports"

[[gates]]
kind = "no_errors"

# [[gates]]
# kind = "coverage"
# threshold = 80.0
"#;

const DEFAULT_RULES: &str = r#"# Principle -> rules. Detector kinds: threshold, pattern, delegated.

single-responsibility:
  - id: SRP001
    detector_kind: threshold
    file_types: [py, js, ts, rs, go, java]
    parameters: { metric: cyclomatic_complexity, max: 10 }
    message_template: "{name} has cyclomatic complexity {value} (max {max})"
    suggested_fix: "split {name} into smaller functions"
  - id: SRP002
    detector_kind: threshold
    file_types: [py, js, ts, java]
    parameters: { metric: method_count, max: 20 }
    severity: warning
  - id: SRP003
    detector_kind: threshold
    parameters: { metric: file_length, max: 800 }
    severity: warning
    exclude: ["**/migrations/**"]

naming:
  - id: NAME001
    detector_kind: pattern
    file_types: [py]
    parameters: { pattern: "^_{0,2}[a-z][a-z0-9_]*$", targets: [functions] }
    severity: warning
    exclude: ["tests/**"]
  - id: NAME002
    detector_kind: pattern
    file_types: [py, ts, java]
    parameters: { pattern: "^[A-Z][A-Za-z0-9]*$", targets: [classes] }
    severity: warning

# security:
#   - id: SEC001
#     detector_kind: delegated
#     file_types: [py]
#     parameters: { command: bandit, args: ["-q", "-f", "json", "{file}"], severity_from_tool: true }
"#;

pub fn run(path: PathBuf, force: bool) -> Result<i32, CliError> {
    write_file(&path.join(CONFIG_FILE_NAME), DEFAULT_CONFIG, force)?;
    write_file(&path.join(DEFAULT_RULES_PATH), DEFAULT_RULES, force)?;
    Ok(EXIT_PASS)
}

fn write_file(target: &Path, content: &str, force: bool) -> Result<(), CliError> {
    if target.exists() && !force {
        println!("exists   {} (use --force to overwrite)", target.display());
        return Ok(());
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
    }
    fs::write(target, content).map_err(|e| CliError::io(target, e))?;
    println!("created  {}", target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conform_analysis::rules::{RuleFormat, RuleSet};
    use conform_core::config::ConformConfig;

    #[test]
    fn default_files_are_valid() {
        let config = ConformConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.validation.effective_rules_path(), DEFAULT_RULES_PATH);
        let rules = RuleSet::load(DEFAULT_RULES, RuleFormat::Yaml).unwrap();
        assert_eq!(rules.len(), 5);
        assert_eq!(rules.principles(), &["single-responsibility", "naming"]);
    }
}
