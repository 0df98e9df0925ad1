//! Report output configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Report formats the CLI knows how to render.
pub const KNOWN_FORMATS: &[&str] = &["text", "json", "github"];

/// Configuration for the `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// "text" | "json" | "github". Default: "text".
    pub format: Option<String>,
    /// ANSI colour in text output. Default: true.
    pub color: Option<bool>,
    /// Directory that receives `conform-report.json` after each run.
    pub report_dir: Option<String>,
}

impl OutputConfig {
    pub fn effective_format(&self) -> &str {
        self.format.as_deref().unwrap_or(constants::DEFAULT_FORMAT)
    }

    pub fn effective_color(&self) -> bool {
        self.color.unwrap_or(true)
    }
}
