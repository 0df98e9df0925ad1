//! Tests for the conform configuration system.

use std::sync::Mutex;

use conform_core::config::{CliOverrides, ConformConfig, GateDefinition};
use conform_core::errors::ConfigError;

/// Serializes tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all CONFORM_ env vars to prevent cross-test contamination.
fn clear_conform_env_vars() {
    for key in [
        "CONFORM_RULES_PATH",
        "CONFORM_THREADS",
        "CONFORM_TOOL_TIMEOUT_MS",
        "CONFORM_MAX_FILE_SIZE",
        "CONFORM_STRICT",
        "CONFORM_PRINCIPLES",
        "CONFORM_FORMAT",
        "CONFORM_COLOR",
        "CONFORM_REPORT_DIR",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("conform.toml"),
        r#"
[validation]
threads = 2
tool_timeout_ms = 1000
strict = false

[output]
format = "json"
"#,
    )
    .unwrap();

    std::env::set_var("CONFORM_THREADS", "6");
    std::env::set_var("CONFORM_STRICT", "true");

    let cli = CliOverrides {
        threads: Some(3),
        ..Default::default()
    };
    let config = ConformConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats env and project.
    assert_eq!(config.validation.threads, Some(3));
    // Env beats project.
    assert_eq!(config.validation.strict, Some(true));
    // Project beats defaults.
    assert_eq!(config.validation.tool_timeout_ms, Some(1000));
    assert_eq!(config.output.effective_format(), "json");

    clear_conform_env_vars();
}

#[test]
fn test_missing_project_config_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    let dir = tempdir();
    let config = ConformConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.validation.effective_rules_path(), ".conform/rules.yaml");
    assert_eq!(config.validation.effective_tool_timeout_ms(), 5_000);
    assert_eq!(config.validation.effective_max_file_size(), 1_048_576);
    assert_eq!(config.validation.effective_threads(), 0);
    assert!(!config.validation.effective_strict());
    assert_eq!(config.output.effective_format(), "text");
    assert!(config.output.effective_color());
    assert_eq!(config.effective_gates(), vec![GateDefinition::NoErrors]);
}

#[test]
fn test_explicit_config_file_must_exist() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    let dir = tempdir();
    let missing = dir.path().join("nope.toml");
    let result = ConformConfig::load_with_file(dir.path(), Some(&missing), None);
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}

#[test]
fn test_explicit_config_file_that_cannot_be_read() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    let dir = tempdir();
    let folder = dir.path().join("conf.d");
    std::fs::create_dir(&folder).unwrap();
    let result = ConformConfig::load_with_file(dir.path(), Some(&folder), None);
    assert!(matches!(result, Err(ConfigError::Unreadable { .. })));
}

#[test]
fn test_explicit_config_file_replaces_project_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("conform.toml"), "[output]\nformat = \"json\"\n").unwrap();
    let other = dir.path().join("ci.toml");
    std::fs::write(&other, "[output]\nformat = \"github\"\n").unwrap();

    let config = ConformConfig::load_with_file(dir.path(), Some(&other), None).unwrap();
    assert_eq!(config.output.effective_format(), "github");
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("conform.toml"), "[validation\nthreads = ").unwrap();
    let result = ConformConfig::load(dir.path(), None);
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_env_principles_are_split() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    std::env::set_var("CONFORM_PRINCIPLES", "solid, naming ,,");
    let dir = tempdir();
    let config = ConformConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.validation.principles, vec!["solid", "naming"]);

    clear_conform_env_vars();
}

#[test]
fn test_unparseable_env_values_are_ignored() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_conform_env_vars();

    std::env::set_var("CONFORM_THREADS", "many");
    let dir = tempdir();
    let config = ConformConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.validation.threads, None);

    clear_conform_env_vars();
}

#[test]
fn test_gates_parse_from_toml() {
    let config = ConformConfig::from_toml(
        r#"
[[gates]]
kind = "no_errors"

[[gates]]
kind = "principle"
name = "naming-clean"
principles = ["naming"]
max_violations = 3

[[gates]]
kind = "coverage"
threshold = 80.0
"#,
    )
    .unwrap();

    assert_eq!(config.gates.len(), 3);
    assert_eq!(config.gates[0], GateDefinition::NoErrors);
    assert_eq!(config.gates[1].name(), "naming-clean");
    assert_eq!(
        config.gates[2],
        GateDefinition::Coverage { threshold: 80.0 }
    );
}

#[test]
fn test_validate_rejects_out_of_range_values() {
    let zero_timeout = ConformConfig::from_toml("[validation]\ntool_timeout_ms = 0\n").unwrap();
    assert!(matches!(
        ConformConfig::validate(&zero_timeout),
        Err(ConfigError::ValidationFailed { .. })
    ));

    let bad_format = ConformConfig::from_toml("[output]\nformat = \"xml\"\n").unwrap();
    assert!(ConformConfig::validate(&bad_format).is_err());

    let bad_threshold =
        ConformConfig::from_toml("[[gates]]\nkind = \"coverage\"\nthreshold = 140.0\n").unwrap();
    assert!(ConformConfig::validate(&bad_threshold).is_err());

    let empty_principles = ConformConfig::from_toml(
        "[[gates]]\nkind = \"principle\"\nname = \"x\"\nprinciples = []\n",
    )
    .unwrap();
    assert!(ConformConfig::validate(&empty_principles).is_err());
}

#[test]
fn test_unknown_keys_are_ignored() {
    let config = ConformConfig::from_toml("[validation]\nthreads = 4\nfuture_knob = true\n").unwrap();
    assert_eq!(config.validation.threads, Some(4));
}

#[test]
fn test_toml_round_trip() {
    let original = ConformConfig::from_toml(
        r#"
[validation]
rules_path = "rules.json"
principles = ["solid"]

[output]
color = false

[[gates]]
kind = "coverage"
threshold = 75.5
"#,
    )
    .unwrap();
    let serialized = original.to_toml().unwrap();
    let reparsed = ConformConfig::from_toml(&serialized).unwrap();
    assert_eq!(original, reparsed);
}
