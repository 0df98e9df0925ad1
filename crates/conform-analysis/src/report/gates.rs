//! Quality gates: named pass/fail predicates over the violation set.

use std::collections::BTreeSet;

use conform_core::config::GateDefinition;

use crate::rules::{Severity, Violation};

/// Everything a gate may look at.
#[derive(Debug, Clone, Copy)]
pub struct GateInput<'a> {
    pub violations: &'a [Violation],
    /// Externally measured coverage percentage, when supplied.
    pub coverage: Option<f64>,
    pub strict: bool,
}

/// Result of evaluating one gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    Passed(String),
    Failed(String),
    /// The gate could not be evaluated; it is left out of `gate_results`.
    Skipped(String),
}

impl GateOutcome {
    pub fn message(&self) -> &str {
        match self {
            Self::Passed(m) | Self::Failed(m) | Self::Skipped(m) => m,
        }
    }

    /// `None` for a skipped gate.
    pub fn passed(&self) -> Option<bool> {
        match self {
            Self::Passed(_) => Some(true),
            Self::Failed(_) => Some(false),
            Self::Skipped(_) => None,
        }
    }
}

/// A quality gate.
pub trait QualityGate: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, input: &GateInput<'_>) -> GateOutcome;
}

/// Passes when no violation is blocking.
#[derive(Debug, Default)]
pub struct NoErrorsGate;

impl QualityGate for NoErrorsGate {
    fn name(&self) -> &str {
        "no-errors"
    }

    fn evaluate(&self, input: &GateInput<'_>) -> GateOutcome {
        let blocking = input
            .violations
            .iter()
            .filter(|v| v.is_blocking(input.strict))
            .count();
        if blocking == 0 {
            GateOutcome::Passed("no blocking violations".to_string())
        } else {
            GateOutcome::Failed(format!("{blocking} blocking violation(s)"))
        }
    }
}

/// Passes when the listed principles have no Error violations and stay
/// within `max_violations`, if set.
#[derive(Debug)]
pub struct PrincipleGate {
    name: String,
    principles: BTreeSet<String>,
    max_violations: Option<usize>,
}

impl PrincipleGate {
    pub fn new(
        name: impl Into<String>,
        principles: impl IntoIterator<Item = impl Into<String>>,
        max_violations: Option<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            principles: principles.into_iter().map(Into::into).collect(),
            max_violations,
        }
    }
}

impl QualityGate for PrincipleGate {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, input: &GateInput<'_>) -> GateOutcome {
        let relevant: Vec<&Violation> = input
            .violations
            .iter()
            .filter(|v| self.principles.contains(&v.principle))
            .collect();
        let errors = relevant
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();

        if errors > 0 {
            return GateOutcome::Failed(format!("{errors} error violation(s)"));
        }
        match self.max_violations {
            Some(max) if relevant.len() > max => GateOutcome::Failed(format!(
                "{} violation(s) exceed the limit of {max}",
                relevant.len()
            )),
            _ => GateOutcome::Passed(format!("{} violation(s), none errors", relevant.len())),
        }
    }
}

/// Passes when supplied coverage reaches `threshold` percent.
#[derive(Debug)]
pub struct CoverageGate {
    threshold: f64,
}

impl CoverageGate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl QualityGate for CoverageGate {
    fn name(&self) -> &str {
        "coverage"
    }

    fn evaluate(&self, input: &GateInput<'_>) -> GateOutcome {
        match input.coverage {
            None => GateOutcome::Skipped("no coverage supplied".to_string()),
            Some(coverage) if coverage >= self.threshold => GateOutcome::Passed(format!(
                "coverage {coverage:.1}% meets {:.1}%",
                self.threshold
            )),
            Some(coverage) => GateOutcome::Failed(format!(
                "coverage {coverage:.1}% below {:.1}%",
                self.threshold
            )),
        }
    }
}

/// Instantiate configured gates in declaration order.
pub fn gates_from_definitions(definitions: &[GateDefinition]) -> Vec<Box<dyn QualityGate>> {
    definitions
        .iter()
        .map(|definition| -> Box<dyn QualityGate> {
            match definition {
                GateDefinition::NoErrors => Box::new(NoErrorsGate),
                GateDefinition::Principle {
                    name,
                    principles,
                    max_violations,
                } => Box::new(PrincipleGate::new(
                    name.clone(),
                    principles.iter().cloned(),
                    *max_violations,
                )),
                GateDefinition::Coverage { threshold } => Box::new(CoverageGate::new(*threshold)),
            }
        })
        .collect()
}
