//! Top-level conform configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::output_config::KNOWN_FORMATS;
use super::{GateDefinition, OutputConfig, ValidationConfig};
use crate::constants;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CONFORM_*`)
/// 3. Project config (`conform.toml` in project root, or an explicit path)
/// 4. User config (`~/.conform/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConformConfig {
    pub validation: ValidationConfig,
    pub output: OutputConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gates: Vec<GateDefinition>,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub rules_path: Option<String>,
    pub threads: Option<usize>,
    pub tool_timeout_ms: Option<u64>,
    pub strict: Option<bool>,
    pub principles: Option<Vec<String>>,
    pub format: Option<String>,
    pub color: Option<bool>,
}

impl ConformConfig {
    /// Load configuration for the project rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        Self::load_with_file(root, None, cli_overrides)
    }

    /// Load configuration, reading the project layer from `config_file`
    /// instead of `<root>/conform.toml` when given. An explicit file that
    /// does not exist is an error; a missing default file is not.
    pub fn load_with_file(
        root: &Path,
        config_file: Option<&Path>,
        cli_overrides: Option<&CliOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        // Layer 3: project config
        match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::merge_toml_file(&mut config, path)?;
            }
            None => {
                let project_config_path = root.join(constants::CONFIG_FILE_NAME);
                if project_config_path.exists() {
                    Self::merge_toml_file(&mut config, &project_config_path)?;
                }
            }
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ConformConfig) -> Result<(), ConfigError> {
        if let Some(timeout) = config.validation.tool_timeout_ms {
            if timeout == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "validation.tool_timeout_ms".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(max_file_size) = config.validation.max_file_size {
            if max_file_size == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "validation.max_file_size".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(threads) = config.validation.threads {
            if threads > 1024 {
                return Err(ConfigError::ValidationFailed {
                    field: "validation.threads".to_string(),
                    message: "must be at most 1024".to_string(),
                });
            }
        }
        if let Some(ref format) = config.output.format {
            if !KNOWN_FORMATS.contains(&format.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "output.format".to_string(),
                    message: format!("must be one of {}", KNOWN_FORMATS.join(", ")),
                });
            }
        }
        for gate in &config.gates {
            match gate {
                GateDefinition::NoErrors => {}
                GateDefinition::Principle {
                    name, principles, ..
                } => {
                    if name.trim().is_empty() {
                        return Err(ConfigError::ValidationFailed {
                            field: "gates.name".to_string(),
                            message: "principle gates need a name".to_string(),
                        });
                    }
                    if principles.is_empty() {
                        return Err(ConfigError::ValidationFailed {
                            field: format!("gates.{name}.principles"),
                            message: "must list at least one principle".to_string(),
                        });
                    }
                }
                GateDefinition::Coverage { threshold } => {
                    if !(0.0..=100.0).contains(threshold) {
                        return Err(ConfigError::ValidationFailed {
                            field: "gates.coverage.threshold".to_string(),
                            message: "must be between 0 and 100".to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The gate set to evaluate: the configured gates, or `no-errors`.
    pub fn effective_gates(&self) -> Vec<GateDefinition> {
        if self.gates.is_empty() {
            GateDefinition::defaults()
        } else {
            self.gates.clone()
        }
    }

    /// Returns the user config path: `~/.conform/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(constants::USER_CONFIG_DIR).join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut ConformConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::from_io(path, e))?;

        let file_config: ConformConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut ConformConfig, other: &ConformConfig) {
        // Validation
        if other.validation.rules_path.is_some() {
            base.validation.rules_path = other.validation.rules_path.clone();
        }
        if other.validation.threads.is_some() {
            base.validation.threads = other.validation.threads;
        }
        if other.validation.tool_timeout_ms.is_some() {
            base.validation.tool_timeout_ms = other.validation.tool_timeout_ms;
        }
        if other.validation.max_file_size.is_some() {
            base.validation.max_file_size = other.validation.max_file_size;
        }
        if other.validation.strict.is_some() {
            base.validation.strict = other.validation.strict;
        }
        if !other.validation.principles.is_empty() {
            base.validation.principles = other.validation.principles.clone();
        }

        // Output
        if other.output.format.is_some() {
            base.output.format = other.output.format.clone();
        }
        if other.output.color.is_some() {
            base.output.color = other.output.color;
        }
        if other.output.report_dir.is_some() {
            base.output.report_dir = other.output.report_dir.clone();
        }

        // Gates are replaced as a whole.
        if !other.gates.is_empty() {
            base.gates = other.gates.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `CONFORM_THREADS`, `CONFORM_FORMAT`, etc.
    fn apply_env_overrides(config: &mut ConformConfig) {
        if let Ok(val) = std::env::var("CONFORM_RULES_PATH") {
            config.validation.rules_path = Some(val);
        }
        if let Ok(val) = std::env::var("CONFORM_THREADS") {
            if let Ok(v) = val.parse::<usize>() {
                config.validation.threads = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_TOOL_TIMEOUT_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.validation.tool_timeout_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_MAX_FILE_SIZE") {
            if let Ok(v) = val.parse::<u64>() {
                config.validation.max_file_size = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_STRICT") {
            if let Ok(v) = val.parse::<bool>() {
                config.validation.strict = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_PRINCIPLES") {
            let principles = split_list(&val);
            if !principles.is_empty() {
                config.validation.principles = principles;
            }
        }
        if let Ok(val) = std::env::var("CONFORM_FORMAT") {
            config.output.format = Some(val);
        }
        if let Ok(val) = std::env::var("CONFORM_COLOR") {
            if let Ok(v) = val.parse::<bool>() {
                config.output.color = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CONFORM_REPORT_DIR") {
            config.output.report_dir = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ConformConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.rules_path {
            config.validation.rules_path = Some(v.clone());
        }
        if let Some(v) = cli.threads {
            config.validation.threads = Some(v);
        }
        if let Some(v) = cli.tool_timeout_ms {
            config.validation.tool_timeout_ms = Some(v);
        }
        if let Some(v) = cli.strict {
            config.validation.strict = Some(v);
        }
        if let Some(ref v) = cli.principles {
            config.validation.principles = v.clone();
        }
        if let Some(ref v) = cli.format {
            config.output.format = Some(v.clone());
        }
        if let Some(v) = cli.color {
            config.output.color = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
