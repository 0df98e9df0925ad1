//! End-to-end validator tests over temporary project trees.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use conform_analysis::detectors::{Detector, Measurement, Metric};
use conform_analysis::report::{
    gates_from_definitions, CoverageGate, NoErrorsGate, NoteKind, PrincipleGate, QualityGate,
};
use conform_analysis::reporters::{parse_json, to_json};
use conform_analysis::rules::{DetectorKind, Rule, RuleFormat, RuleSet, Severity, TemplateVars, Violation};
use conform_analysis::scanner::SourceFile;
use conform_analysis::{Status, ValidationScope, Validator};
use conform_core::config::{ConformConfig, GateDefinition};
use conform_core::errors::{ConfigError, DetectionError};
use conform_core::events::types::*;
use conform_core::events::{ConformEventHandler, EventDispatcher};
use conform_core::traits::{Cancellable, CancellationToken};
use proptest::prelude::*;
use tempfile::TempDir;

const RULES: &str = r#"
solid:
  - id: SRP001
    detector_kind: threshold
    file_types: [py]
    parameters: { metric: cyclomatic_complexity, max: 10 }
naming:
  - id: NAME001
    detector_kind: pattern
    file_types: [py]
    parameters: { pattern: "^[a-z_][a-z0-9_]*$" }
"#;

fn rules(source: &str) -> RuleSet {
    RuleSet::load(source, RuleFormat::Yaml).unwrap()
}

fn validator(dir: &TempDir, source: &str) -> Validator {
    Validator::builder(rules(source))
        .with_root(dir.path())
        .build()
        .unwrap()
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn branchy_python(name: &str, branches: usize) -> String {
    let mut src = format!("def {name}(x):\n");
    for i in 0..branches {
        src.push_str(&format!("    if x == {i}:\n        x += 1\n"));
    }
    src.push_str("    return x\n");
    src
}

#[test]
fn test_complex_function_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "app/service.py", &branchy_python("process_order", 11));

    let report = validator(&dir, RULES).validate(ValidationScope::new([file]));

    assert_eq!(report.status, Status::Fail);
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.rule_id, "SRP001");
    assert_eq!(v.severity, Severity::Error);
    assert_eq!(v.file_path, "app/service.py");
    assert_eq!(v.line_number, Some(1));
    assert_eq!(report.gate_results.get("no-errors"), Some(&false));
    assert!(!report.passed());
    assert_eq!(report.metadata.files_checked, 1);
}

#[test]
fn test_naming_rule_flags_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(&dir, "bad.py", "def myFunc(): pass\n");
    let good = write(&dir, "good.py", "def my_func(): pass\n");
    let v = validator(&dir, RULES);

    let report = v.validate(ValidationScope::new([bad]));
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rule_id, "NAME001");
    assert!(report.violations[0].message.contains("myFunc"));

    let report = v.validate(ValidationScope::new([good]));
    assert!(report.violations.is_empty());
    assert_eq!(report.status, Status::Pass);
}

#[test]
fn test_empty_scope_passes() {
    let dir = tempfile::tempdir().unwrap();
    let report = validator(&dir, RULES).validate(ValidationScope::default());
    assert_eq!(report.status, Status::Pass);
    assert!(report.violations.is_empty());
    assert!(report.notes.is_empty());
    assert_eq!(report.metadata.files_checked, 0);
    assert!(report.passed());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_zero_rules_always_pass(
        names in proptest::collection::vec("[a-z]{1,8}\\.(py|ts|rs|go|txt|bin|yaml)", 0..12)
    ) {
        let v = Validator::new(RuleSet::new()).unwrap();
        let scope = ValidationScope::new(names.iter().map(|n| Path::new("/nonexistent").join(n)));
        let report = v.validate(scope);
        prop_assert_eq!(report.status, Status::Pass);
        prop_assert!(report.violations.is_empty());
    }
}

#[test]
fn test_violations_are_sorted_and_output_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write(&dir, "z.py", "def zetaFunc(): pass\ndef alphaFunc(): pass\n"),
        write(&dir, "a.py", &format!("def Camel(): pass\n{}", branchy_python("big", 12))),
        write(&dir, "m/k.py", "def okay(): pass\ndef NotOkay(): pass\n"),
    ];
    let v = Validator::builder(rules(RULES))
        .with_root(dir.path())
        .with_threads(4)
        .build()
        .unwrap();

    let first = v.validate(ValidationScope::new(files.clone()));
    let keys: Vec<(String, String, Option<u32>)> = first
        .violations
        .iter()
        .map(|v| (v.file_path.clone(), v.rule_id.clone(), v.line_number))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("a.py".to_string(), "NAME001".to_string(), Some(1)),
            ("a.py".to_string(), "SRP001".to_string(), Some(2)),
            ("m/k.py".to_string(), "NAME001".to_string(), Some(2)),
            ("z.py".to_string(), "NAME001".to_string(), Some(1)),
            ("z.py".to_string(), "NAME001".to_string(), Some(2)),
        ]
    );

    let second = v.validate(ValidationScope::new(files));
    assert_eq!(to_json(&first).unwrap(), to_json(&second).unwrap());
}

#[test]
fn test_json_round_trip_keeps_status_and_counts() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "x.py", "def badName(): pass\n");
    let report = validator(&dir, RULES).validate(ValidationScope::new([file]));

    let doc = parse_json(&to_json(&report).unwrap()).unwrap();
    assert_eq!(doc.status, report.status);
    assert_eq!(doc.violations.len(), report.violations.len());
    assert_eq!(doc.violations, report.violations);
    assert_eq!(doc.summary.errors, 1);
    assert_eq!(doc.summary.compliance_score, 90);
    assert_eq!(doc.metadata.duration_ms, None);
}

#[test]
fn test_infrastructure_problems_become_notes() {
    let dir = tempfile::tempdir().unwrap();
    let readme = write(&dir, "README.txt", "hello\n");
    let blob = write(&dir, "blob.py", "\0\0\0binary");
    let missing = dir.path().join("gone.py");

    let report = validator(&dir, RULES).validate(ValidationScope::new([readme, blob, missing]));

    assert_eq!(report.status, Status::Pass);
    assert!(report.violations.is_empty());
    let kinds: Vec<(NoteKind, Option<&str>)> = report
        .notes
        .iter()
        .map(|n| (n.kind, n.file_path.as_deref()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (NoteKind::UnknownFileType, Some("README.txt")),
            (NoteKind::UnreadableFile, Some("blob.py")),
            (NoteKind::UnreadableFile, Some("gone.py")),
        ]
    );
    assert!(report.notes.iter().all(|n| n.severity == Severity::Info));
}

#[test]
fn test_oversized_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "big.py", &"def badName(): pass\n".repeat(100));
    let v = Validator::builder(rules(RULES))
        .with_root(dir.path())
        .with_max_file_size(64)
        .build()
        .unwrap();
    let report = v.validate(ValidationScope::new([file]));
    assert!(report.violations.is_empty());
    assert_eq!(report.notes.len(), 1);
    assert_eq!(report.notes[0].kind, NoteKind::UnreadableFile);
}

#[test]
fn test_tool_failures_become_notes() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "a.py", "x = 1\n");
    let source = "tools:\n  - { id: LINT001, detector_kind: delegated, parameters: { command: conform-no-such-tool-xyz, adapter: lines } }\n";

    let report = validator(&dir, source).validate(ValidationScope::new([file]));

    assert_eq!(report.status, Status::Pass);
    assert_eq!(report.notes.len(), 1);
    assert_eq!(report.notes[0].kind, NoteKind::ToolExecution);
    assert_eq!(report.notes[0].rule_id.as_deref(), Some("LINT001"));
    assert_eq!(report.metadata.tool_versions.get("conform").map(String::as_str), Some(conform_core::constants::VERSION));
}

#[test]
fn test_inline_suppressions() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        &dir,
        "s.py",
        "def ignoredOne(): pass  # conform-ignore\n\
         # conform-ignore NAME001\n\
         def ignoredTwo(): pass\n\
         def ignoredThree(): pass  # noqa: NAME001\n\
         # conform-ignore SRP001\n\
         def reportedOne(): pass\n",
    );
    let report = validator(&dir, RULES).validate(ValidationScope::new([file]));
    assert_eq!(report.violations.len(), 1);
    assert!(report.violations[0].message.contains("reportedOne"));
    assert_eq!(report.metadata.suppressed, 3);
}

#[test]
fn test_excluded_paths_and_principle_filter() {
    let dir = tempfile::tempdir().unwrap();
    let source = r#"
naming:
  - id: NAME001
    detector_kind: pattern
    exclude: ["tests/**"]
    parameters: { pattern: "^[a-z_]+$" }
solid:
  - id: SRP001
    detector_kind: threshold
    parameters: { max: 1 }
"#;
    let test_file = write(&dir, "tests/test_x.py", "def testCamel(): pass\n");
    let app_file = write(&dir, "app.py", "def appCamel(x):\n    if x:\n        return 1\n    return 2\n");
    let v = validator(&dir, source);

    let report = v.validate(ValidationScope::new([test_file.clone(), app_file.clone()]));
    let ids: Vec<(&str, &str)> = report
        .violations
        .iter()
        .map(|v| (v.file_path.as_str(), v.rule_id.as_str()))
        .collect();
    assert_eq!(ids, vec![("app.py", "NAME001"), ("app.py", "SRP001")]);

    let report = v.validate(ValidationScope::new([test_file, app_file]).with_principles(["solid"]));
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rule_id, "SRP001");
    assert_eq!(report.metadata.scope.principles, vec!["solid".to_string()]);
}

#[test]
fn test_strict_mode_blocks_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let source = "naming:\n  - { id: NAME001, detector_kind: pattern, severity: warning, parameters: { pattern: '^[a-z_]+$' } }\n";
    let file = write(&dir, "w.py", "def Warned(): pass\n");
    let v = validator(&dir, source);

    let relaxed = v.validate(ValidationScope::new([file.clone()]));
    assert_eq!(relaxed.status, Status::Warning);
    assert!(relaxed.passed());

    let strict = v.validate(ValidationScope::new([file]).strict(true));
    assert_eq!(strict.status, Status::Fail);
    assert_eq!(strict.gate_results.get("no-errors"), Some(&false));
}

#[test]
fn test_gates_from_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "g.py", "def Camel(): pass\n");
    let definitions = vec![
        GateDefinition::NoErrors,
        GateDefinition::Principle {
            name: "solid-clean".to_string(),
            principles: vec!["solid".to_string()],
            max_violations: None,
        },
        GateDefinition::Principle {
            name: "naming-clean".to_string(),
            principles: vec!["naming".to_string()],
            max_violations: Some(0),
        },
        GateDefinition::Coverage { threshold: 80.0 },
    ];
    let v = Validator::builder(rules(RULES))
        .with_root(dir.path())
        .with_gates(gates_from_definitions(&definitions))
        .build()
        .unwrap();

    let report = v.validate(ValidationScope::new([file.clone()]));
    assert_eq!(report.gate_results.get("no-errors"), Some(&false));
    assert_eq!(report.gate_results.get("solid-clean"), Some(&true));
    assert_eq!(report.gate_results.get("naming-clean"), Some(&false));
    assert!(!report.gate_results.contains_key("coverage"));
    assert!(report.notes.iter().any(|n| n.kind == NoteKind::GateSkipped));

    let report = v.validate(ValidationScope::new([file.clone()]).with_coverage(85.0));
    assert_eq!(report.gate_results.get("coverage"), Some(&true));
    let report = v.validate(ValidationScope::new([file]).with_coverage(50.0));
    assert_eq!(report.gate_results.get("coverage"), Some(&false));
}

#[test]
fn test_gate_only_failure_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "ok.py", "def fine(): pass\n");
    let gates: Vec<Box<dyn QualityGate>> = vec![
        Box::new(NoErrorsGate),
        Box::new(PrincipleGate::new("naming", ["naming"], Some(0))),
        Box::new(CoverageGate::new(90.0)),
    ];
    let v = Validator::builder(rules(RULES))
        .with_root(dir.path())
        .with_gates(gates)
        .build()
        .unwrap();
    let report = v.validate(ValidationScope::new([file]).with_coverage(10.0));
    assert_eq!(report.status, Status::Pass);
    assert!(!report.passed());
}

#[test]
fn test_unknown_metric_is_rejected_at_construction() {
    let source = "solid:\n  - { id: X1, detector_kind: threshold, parameters: { metric: halstead_volume, max: 5 } }\n";
    match Validator::new(rules(source)) {
        Err(ConfigError::UnknownMetric { rule, metric }) => {
            assert_eq!(rule, "X1");
            assert_eq!(metric, "halstead_volume");
        }
        other => panic!("expected unknown metric error, got {other:?}"),
    }
}

struct TodoCount;

impl Metric for TodoCount {
    fn name(&self) -> &str {
        "todo_count"
    }

    fn measure(&self, file: &SourceFile) -> Result<Vec<Measurement>, DetectionError> {
        Ok(vec![Measurement {
            subject: file.display_path().to_string(),
            line: None,
            value: file.content().matches("TODO").count() as f64,
        }])
    }
}

#[test]
fn test_custom_metric_can_be_registered() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "t.go", "package main\n// TODO one\n// TODO two\n");
    let source = "hygiene:\n  - { id: TODO001, detector_kind: threshold, severity: info, parameters: { metric: todo_count, max: 1 } }\n";
    let v = Validator::builder(rules(source))
        .with_root(dir.path())
        .with_metric(Arc::new(TodoCount))
        .build()
        .unwrap();
    let report = v.validate(ValidationScope::new([file]));
    assert_eq!(report.status, Status::Warning);
    assert_eq!(report.violations[0].message, "t.go has todo_count 2 (max 1)");
}

struct FlagEverything;

impl Detector for FlagEverything {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Pattern
    }

    fn detect(&self, file: &SourceFile, rule: &Rule) -> Result<Vec<Violation>, DetectionError> {
        Ok(vec![rule.violation(
            file.display_path(),
            Some(1),
            rule.severity,
            TemplateVars::new().set("identifier", "everything"),
        )])
    }
}

#[test]
fn test_detectors_can_be_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "p.py", "def fine(): pass\n");
    let v = Validator::builder(rules(RULES))
        .with_root(dir.path())
        .with_detector(Arc::new(FlagEverything))
        .build()
        .unwrap();
    let report = v.validate(ValidationScope::new([file]));
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].rule_id, "NAME001");
}

/// Cancels the run once the first file is checked.
struct CancelAfterFirstFile {
    token: CancellationToken,
}

impl ConformEventHandler for CancelAfterFirstFile {
    fn on_file_checked(&self, _event: &FileCheckedEvent) {
        self.token.cancel();
    }
}

#[test]
fn test_cancellation_returns_partial_report() {
    let dir = tempfile::tempdir().unwrap();
    let files: Vec<PathBuf> = (0..6)
        .map(|i| write(&dir, &format!("f{i}.py"), &format!("def badName{i}(): pass\n")))
        .collect();

    let full = validator(&dir, RULES).validate(ValidationScope::new(files.clone()));
    assert_eq!(full.violations.len(), 6);
    assert!(!full.metadata.cancelled);

    let token = CancellationToken::new();
    let v = Validator::builder(rules(RULES))
        .with_root(dir.path())
        .with_threads(1)
        .with_event_handler(Arc::new(CancelAfterFirstFile {
            token: token.clone(),
        }))
        .build()
        .unwrap();
    let partial = v.validate_with_cancellation(ValidationScope::new(files), &token);

    assert!(partial.metadata.cancelled);
    assert!(partial.violations.len() < full.violations.len());
    assert!(partial
        .violations
        .iter()
        .all(|v| full.violations.contains(v)));
}

#[test]
fn test_cancelled_before_start_checks_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "a.py", "def badName(): pass\n");
    let token = CancellationToken::new();
    token.cancel();
    let report = validator(&dir, RULES).validate_with_cancellation(ValidationScope::new([file]), &token);
    assert!(report.metadata.cancelled);
    assert_eq!(report.metadata.files_checked, 0);
    assert!(report.violations.is_empty());
}

#[derive(Default)]
struct Recorder {
    phases: Mutex<Vec<(ValidationPhase, ValidationPhase)>>,
    files: Mutex<usize>,
    gates: Mutex<Vec<(String, bool)>>,
    errors: Mutex<Vec<String>>,
    completed: Mutex<Option<String>>,
}

impl ConformEventHandler for Recorder {
    fn on_phase_changed(&self, event: &PhaseChangedEvent) {
        self.phases.lock().unwrap().push((event.from, event.to));
    }

    fn on_file_checked(&self, _event: &FileCheckedEvent) {
        *self.files.lock().unwrap() += 1;
    }

    fn on_gate_evaluated(&self, event: &GateEvaluatedEvent) {
        self.gates
            .lock()
            .unwrap()
            .push((event.gate_name.clone(), event.passed));
    }

    fn on_error(&self, event: &ErrorEvent) {
        self.errors.lock().unwrap().push(event.error_code.clone());
    }

    fn on_validation_complete(&self, event: &ValidationCompleteEvent) {
        *self.completed.lock().unwrap() = Some(event.status.clone());
    }
}

#[test]
fn test_from_config_loads_rules_and_reports_phases() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, ".conform/rules.yaml", RULES);
    let file = write(&dir, "src/mod.py", "def Bad(): pass\n");

    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());

    let v = Validator::from_config(dir.path(), &ConformConfig::default(), events).unwrap();
    assert_eq!(v.rules().len(), 2);
    let report = v.validate(ValidationScope::new([file]));
    assert_eq!(report.violations[0].file_path, "src/mod.py");

    use ValidationPhase::*;
    assert_eq!(
        *recorder.phases.lock().unwrap(),
        vec![
            (Idle, Loading),
            (Loading, Idle),
            (Idle, Classifying),
            (Classifying, Detecting),
            (Detecting, Aggregating),
            (Aggregating, Done),
        ]
    );
    assert_eq!(*recorder.files.lock().unwrap(), 1);
    assert_eq!(
        *recorder.gates.lock().unwrap(),
        vec![("no-errors".to_string(), false)]
    );
    assert_eq!(recorder.completed.lock().unwrap().as_deref(), Some("fail"));
}

#[test]
fn test_from_config_without_rules_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Arc::new(Recorder::default());
    let mut events = EventDispatcher::new();
    events.register(recorder.clone());

    let result = Validator::from_config(dir.path(), &ConformConfig::default(), events);
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    assert_eq!(*recorder.errors.lock().unwrap(), vec!["CONFIG_ERROR".to_string()]);
    assert_eq!(*recorder.files.lock().unwrap(), 0);
}

#[test]
fn test_validators_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(&dir, "i.py", "def Bad(): pass\n");
    let strict_naming = validator(&dir, RULES);
    let nothing = Validator::new(RuleSet::new()).unwrap();
    assert_eq!(strict_naming.validate(ValidationScope::new([file.clone()])).violations.len(), 1);
    assert!(nothing.validate(ValidationScope::new([file])).violations.is_empty());
}
