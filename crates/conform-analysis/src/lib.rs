//! conform-analysis: the validation engine.
//!
//! Rule registry, file classifier, syntax outline, detectors, quality
//! gates, report aggregation, reporters and the [`Validator`] facade.

pub mod detectors;
pub mod orchestrator;
pub mod report;
pub mod reporters;
pub mod rules;
pub mod scanner;
pub mod syntax;

pub use orchestrator::{ValidationScope, Validator, ValidatorBuilder};
pub use report::{ComplianceReport, Note, NoteKind, Status};
pub use reporters::{create_reporter, to_json, to_text, Reporter};
pub use rules::{Rule, RuleFormat, RuleSet, Severity, Violation};
pub use scanner::{classify, FileType};
