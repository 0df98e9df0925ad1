//! Folds violations, notes and gate outcomes into a [`ComplianceReport`].

use std::collections::BTreeMap;

use super::gates::{GateInput, GateOutcome, QualityGate};
use super::types::{ComplianceReport, Note, NoteKind, ReportMetadata, Status};
use crate::rules::Violation;

/// Evaluate `gates` and derive the status. Input order is preserved.
pub fn aggregate(
    violations: Vec<Violation>,
    notes: Vec<Note>,
    gates: &[Box<dyn QualityGate>],
    coverage: Option<f64>,
    strict: bool,
) -> ComplianceReport {
    aggregate_with(violations, notes, gates, coverage, strict, |_, _| {})
}

/// [`aggregate`], calling `on_gate` with each outcome as it is evaluated.
pub fn aggregate_with(
    violations: Vec<Violation>,
    mut notes: Vec<Note>,
    gates: &[Box<dyn QualityGate>],
    coverage: Option<f64>,
    strict: bool,
    mut on_gate: impl FnMut(&str, &GateOutcome),
) -> ComplianceReport {
    let input = GateInput {
        violations: &violations,
        coverage,
        strict,
    };

    let mut gate_results = BTreeMap::new();
    for gate in gates {
        let outcome = gate.evaluate(&input);
        on_gate(gate.name(), &outcome);
        match outcome.passed() {
            Some(passed) => {
                gate_results.insert(gate.name().to_string(), passed);
            }
            None => notes.push(Note::new(
                NoteKind::GateSkipped,
                format!("gate '{}' skipped: {}", gate.name(), outcome.message()),
            )),
        }
    }

    ComplianceReport {
        status: Status::derive(&violations, strict),
        violations,
        gate_results,
        notes,
        metadata: ReportMetadata::default(),
    }
}
