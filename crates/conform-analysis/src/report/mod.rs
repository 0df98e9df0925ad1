//! Compliance report: data model, quality gates and aggregation.

pub mod aggregator;
pub mod gates;
pub mod types;

pub use aggregator::{aggregate, aggregate_with};
pub use gates::{
    gates_from_definitions, CoverageGate, GateInput, GateOutcome, NoErrorsGate, PrincipleGate,
    QualityGate,
};
pub use types::{ComplianceReport, Note, NoteKind, ReportMetadata, ScopeSummary, Status};
