//! Quality gate definitions.

use serde::{Deserialize, Serialize};

/// One `[[gates]]` entry. Gates are evaluated in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateDefinition {
    /// Passes when no blocking violation exists.
    NoErrors,
    /// Passes when the listed principles have no Error violations and,
    /// if `max_violations` is set, at most that many violations in total.
    Principle {
        name: String,
        principles: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_violations: Option<usize>,
    },
    /// Passes when externally measured coverage is at least `threshold` percent.
    Coverage { threshold: f64 },
}

impl GateDefinition {
    /// The gate name as it appears in `gate_results`.
    pub fn name(&self) -> &str {
        match self {
            Self::NoErrors => "no-errors",
            Self::Principle { name, .. } => name,
            Self::Coverage { .. } => "coverage",
        }
    }

    /// The gate set used when the config declares none.
    pub fn defaults() -> Vec<GateDefinition> {
        vec![GateDefinition::NoErrors]
    }
}
