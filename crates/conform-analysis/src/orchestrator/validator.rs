//! The validator: classify, detect, suppress, sort, aggregate.
//!
//! A run moves through `Idle -> Classifying -> Detecting -> Aggregating ->
//! Done`; [`Validator::from_config`] adds the `Loading` phase in front.
//! Files are evaluated in parallel on the validator's own rayon pool,
//! rules for one file run sequentially in declaration order.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use conform_core::config::ConformConfig;
use conform_core::constants::{
    DEFAULT_MAX_FILE_SIZE, DEFAULT_THREADS, DEFAULT_TOOL_TIMEOUT_MS, VERSION,
};
use conform_core::errors::{ConfigError, ConformErrorCode, DetectionError};
use conform_core::events::types::*;
use conform_core::events::{ConformEventHandler, EventDispatcher};
use conform_core::traits::{Cancellable, CancellationToken};

use super::scope::ValidationScope;
use crate::detectors::delegated::process::tool_version;
use crate::detectors::{Detector, DetectorSet, Metric, MetricRegistry};
use crate::report::{
    aggregate_with, gates_from_definitions, ComplianceReport, GateOutcome, NoErrorsGate, Note,
    NoteKind, QualityGate, ScopeSummary,
};
use crate::rules::{DetectorConfig, Rule, RuleSet, SuppressionChecker, Violation};
use crate::scanner::{classify, display_path, read_source, FileType, SourceFile};

/// Validates file sets against a [`RuleSet`]. Several validators may
/// coexist; nothing is process-global.
pub struct Validator {
    rules: Arc<RuleSet>,
    detectors: DetectorSet,
    gates: Vec<Box<dyn QualityGate>>,
    pool: rayon::ThreadPool,
    tool_timeout: Duration,
    max_file_size: u64,
    root: Option<PathBuf>,
    suppression: SuppressionChecker,
    events: EventDispatcher,
}

/// Builder for [`Validator`].
pub struct ValidatorBuilder {
    rules: Arc<RuleSet>,
    metrics: MetricRegistry,
    detectors: Vec<Arc<dyn Detector>>,
    gates: Option<Vec<Box<dyn QualityGate>>>,
    threads: usize,
    tool_timeout: Duration,
    max_file_size: u64,
    root: Option<PathBuf>,
    events: EventDispatcher,
}

impl ValidatorBuilder {
    fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            metrics: MetricRegistry::with_builtins(),
            detectors: Vec::new(),
            gates: None,
            threads: DEFAULT_THREADS,
            tool_timeout: Duration::from_millis(DEFAULT_TOOL_TIMEOUT_MS),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            root: None,
            events: EventDispatcher::new(),
        }
    }

    /// Register an additional metric for threshold rules.
    pub fn with_metric(mut self, metric: Arc<dyn Metric>) -> Self {
        self.metrics.register(metric);
        self
    }

    /// Replace the built-in detector of `detector.kind()`.
    pub fn with_detector(mut self, detector: Arc<dyn Detector>) -> Self {
        self.detectors.push(detector);
        self
    }

    /// Gates to evaluate; defaults to the `no-errors` gate alone.
    pub fn with_gates(mut self, gates: Vec<Box<dyn QualityGate>>) -> Self {
        self.gates = Some(gates);
        self
    }

    /// Worker threads; 0 uses the number of CPUs.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Report paths relative to `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn ConformEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = events;
        self
    }

    /// Fails when a threshold rule names an unregistered metric or the
    /// worker pool cannot be built.
    pub fn build(self) -> Result<Validator, ConfigError> {
        for rule in self.rules.iter() {
            if let DetectorConfig::Threshold(params) = &rule.detector {
                if !self.metrics.contains(&params.metric) {
                    return Err(ConfigError::UnknownMetric {
                        rule: rule.id.clone(),
                        metric: params.metric.clone(),
                    });
                }
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("conform-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ValidationFailed {
                field: "validation.threads".to_string(),
                message: e.to_string(),
            })?;

        let detectors = self.detectors.into_iter().fold(
            DetectorSet::new(Arc::new(self.metrics), self.tool_timeout),
            DetectorSet::with_detector,
        );
        let gates = self
            .gates
            .unwrap_or_else(|| vec![Box::new(NoErrorsGate) as Box<dyn QualityGate>]);

        Ok(Validator {
            rules: self.rules,
            detectors,
            gates,
            pool,
            tool_timeout: self.tool_timeout,
            max_file_size: self.max_file_size,
            root: self.root,
            suppression: SuppressionChecker::new(),
            events: self.events,
        })
    }
}

/// One classified file and the rules that apply to it.
struct WorkItem<'a> {
    path: &'a Path,
    display: String,
    file_type: FileType,
    rules: Vec<&'a Rule>,
}

/// Everything one file contributed.
#[derive(Default)]
struct FileOutcome {
    violations: Vec<Violation>,
    notes: Vec<Note>,
    suppressed: usize,
    /// Delegated commands that ran to completion.
    tools: BTreeSet<String>,
}

impl Validator {
    /// A validator with default settings.
    pub fn new(rules: RuleSet) -> Result<Self, ConfigError> {
        Self::builder(rules).build()
    }

    pub fn builder(rules: impl Into<Arc<RuleSet>>) -> ValidatorBuilder {
        ValidatorBuilder::new(rules.into())
    }

    /// Load the rule file named by `config` and build a validator from the
    /// config's settings. Paths are resolved against `root`.
    pub fn from_config(
        root: &Path,
        config: &ConformConfig,
        events: EventDispatcher,
    ) -> Result<Self, ConfigError> {
        let _span = tracing::info_span!("loading", root = %root.display()).entered();
        events.emit_phase_changed(&PhaseChangedEvent {
            from: ValidationPhase::Idle,
            to: ValidationPhase::Loading,
        });

        let result = Self::load(root, config, events.clone());
        if let Err(e) = &result {
            tracing::error!(error = %e, "failed to load configuration");
            events.emit_error(&ErrorEvent {
                message: e.to_string(),
                error_code: e.error_code().to_string(),
            });
        }
        events.emit_phase_changed(&PhaseChangedEvent {
            from: ValidationPhase::Loading,
            to: ValidationPhase::Idle,
        });
        result
    }

    fn load(root: &Path, config: &ConformConfig, events: EventDispatcher) -> Result<Self, ConfigError> {
        let rules_path = root.join(config.validation.effective_rules_path());
        let rules = RuleSet::load_path(&rules_path)?;
        tracing::info!(
            rules = rules.len(),
            path = %rules_path.display(),
            "rule set loaded"
        );

        Self::builder(rules)
            .with_threads(config.validation.effective_threads())
            .with_tool_timeout(Duration::from_millis(
                config.validation.effective_tool_timeout_ms(),
            ))
            .with_max_file_size(config.validation.effective_max_file_size())
            .with_gates(gates_from_definitions(&config.effective_gates()))
            .with_root(root)
            .with_events(events)
            .build()
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Validate `scope` to completion.
    pub fn validate(&self, scope: ValidationScope) -> ComplianceReport {
        self.validate_with_cancellation(scope, &CancellationToken::new())
    }

    /// Validate `scope`, stopping early once `token` is cancelled. The
    /// partial report then has `metadata.cancelled` set.
    pub fn validate_with_cancellation(
        &self,
        scope: ValidationScope,
        token: &CancellationToken,
    ) -> ComplianceReport {
        let start = Instant::now();
        let span = tracing::info_span!(
            "validate",
            files = scope.file_paths.len(),
            strict = scope.strict_mode
        );
        let _guard = span.enter();

        self.events.emit_validation_started(&ValidationStartedEvent {
            file_count: scope.file_paths.len(),
            rule_count: self.rules.len(),
            strict: scope.strict_mode,
        });

        self.transition(ValidationPhase::Idle, ValidationPhase::Classifying);
        let mut notes = Vec::new();
        let work = self.classify_scope(&scope, &mut notes);

        self.transition(ValidationPhase::Classifying, ValidationPhase::Detecting);
        let outcomes: Vec<FileOutcome> = self.pool.install(|| {
            work.par_iter()
                .filter_map(|item| self.check_file(item, token))
                .collect()
        });

        let files_checked = outcomes.len();
        let mut violations = Vec::new();
        let mut suppressed = 0;
        let mut tools = BTreeSet::new();
        for outcome in outcomes {
            violations.extend(outcome.violations);
            notes.extend(outcome.notes);
            suppressed += outcome.suppressed;
            tools.extend(outcome.tools);
        }
        violations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        notes.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        self.transition(ValidationPhase::Detecting, ValidationPhase::Aggregating);
        let mut report = aggregate_with(
            violations,
            notes,
            &self.gates,
            scope.coverage,
            scope.strict_mode,
            |name, outcome| self.gate_evaluated(name, outcome),
        );

        let cancelled = token.is_cancelled();
        let metadata = &mut report.metadata;
        metadata.tool_versions.insert("conform".to_string(), VERSION.to_string());
        if !cancelled {
            for tool in &tools {
                if let Some(version) = tool_version(tool, self.tool_timeout) {
                    metadata.tool_versions.insert(tool.clone(), version);
                }
            }
        }
        metadata.scope = ScopeSummary {
            files: scope.file_paths.len(),
            principles: scope.principles_to_check.iter().cloned().collect(),
            strict: scope.strict_mode,
            coverage: scope.coverage,
        };
        metadata.cancelled = cancelled;
        metadata.files_checked = files_checked;
        metadata.suppressed = suppressed;
        metadata.duration = start.elapsed();

        self.transition(ValidationPhase::Aggregating, ValidationPhase::Done);
        tracing::info!(
            status = %report.status,
            violations = report.violations.len(),
            files_checked,
            cancelled,
            "validation complete"
        );
        self.events.emit_validation_complete(&ValidationCompleteEvent {
            status: report.status.as_str().to_string(),
            violations: report.violations.len(),
            files_checked,
            duration_ms: report.metadata.duration.as_millis() as u64,
            cancelled,
        });
        report
    }

    fn classify_scope<'a>(
        &'a self,
        scope: &'a ValidationScope,
        notes: &mut Vec<Note>,
    ) -> Vec<WorkItem<'a>> {
        let mut work = Vec::with_capacity(scope.file_paths.len());
        for path in &scope.file_paths {
            let shown = display_path(path, self.root.as_deref());
            let Some(file_type) = classify(path) else {
                tracing::debug!(file = %shown, "unknown file type, skipping");
                self.record_note(
                    notes,
                    Note::new(NoteKind::UnknownFileType, "unrecognised file type; no rules apply")
                        .with_file(&shown),
                );
                continue;
            };
            let rules = self
                .rules
                .rules_for(file_type, &scope.principles_to_check)
                .into_iter()
                .filter(|rule| !rule.is_excluded(&shown))
                .collect();
            work.push(WorkItem {
                path,
                display: shown,
                file_type,
                rules,
            });
        }
        work
    }

    /// `None` when cancellation was requested before the file started.
    fn check_file(&self, item: &WorkItem<'_>, token: &CancellationToken) -> Option<FileOutcome> {
        token.check().ok()?;
        let _span = tracing::debug_span!("file", path = %item.display).entered();
        let mut outcome = FileOutcome::default();

        if !item.rules.is_empty() {
            match read_source(item.path, &item.display, item.file_type, self.max_file_size) {
                Ok(source) => {
                    let lines = source.lines();
                    for rule in &item.rules {
                        if token.is_cancelled() {
                            break;
                        }
                        self.run_rule(&source, &lines, rule, &mut outcome);
                    }
                }
                Err(e) => {
                    tracing::warn!(file = %item.display, error = %e, "unreadable file");
                    self.record_note(
                        &mut outcome.notes,
                        Note::new(NoteKind::UnreadableFile, e.to_string()).with_file(&item.display),
                    );
                }
            }
        }

        tracing::debug!(
            rules = item.rules.len(),
            violations = outcome.violations.len(),
            "file checked"
        );
        self.events.emit_file_checked(&FileCheckedEvent {
            path: item.path.to_path_buf(),
            file_type: item.file_type.tag().to_string(),
            rules_applied: item.rules.len(),
            violations: outcome.violations.len(),
        });
        Some(outcome)
    }

    fn run_rule(
        &self,
        source: &SourceFile,
        lines: &[&str],
        rule: &Rule,
        outcome: &mut FileOutcome,
    ) {
        match self.detectors.detect(source, rule) {
            Ok(found) => {
                if let DetectorConfig::Delegated(params) = &rule.detector {
                    outcome.tools.insert(params.command.clone());
                }
                for violation in found {
                    if self
                        .suppression
                        .is_suppressed(lines, violation.line_number, &violation.rule_id)
                    {
                        outcome.suppressed += 1;
                    } else {
                        outcome.violations.push(violation);
                    }
                }
            }
            Err(e) => {
                let kind = match &e {
                    DetectionError::Tool(_) => NoteKind::ToolExecution,
                    _ => NoteKind::Detection,
                };
                tracing::warn!(
                    file = %source.display_path(),
                    rule = %rule.id,
                    code = e.error_code(),
                    error = %e,
                    "rule could not be evaluated"
                );
                self.record_note(
                    &mut outcome.notes,
                    Note::new(kind, e.to_string())
                        .with_file(source.display_path())
                        .with_rule(&rule.id),
                );
            }
        }
    }

    fn record_note(&self, notes: &mut Vec<Note>, note: Note) {
        self.events.emit_note_recorded(&NoteRecordedEvent {
            kind: note.kind.as_str().to_string(),
            file_path: note.file_path.clone(),
            rule_id: note.rule_id.clone(),
            message: note.message.clone(),
        });
        notes.push(note);
    }

    fn gate_evaluated(&self, name: &str, outcome: &GateOutcome) {
        match outcome.passed() {
            Some(passed) => {
                tracing::debug!(gate = name, passed, "gate evaluated");
                self.events.emit_gate_evaluated(&GateEvaluatedEvent {
                    gate_name: name.to_string(),
                    passed,
                    message: outcome.message().to_string(),
                });
            }
            None => {
                tracing::info!(gate = name, reason = outcome.message(), "gate skipped");
                self.events.emit_note_recorded(&NoteRecordedEvent {
                    kind: NoteKind::GateSkipped.as_str().to_string(),
                    file_path: None,
                    rule_id: None,
                    message: outcome.message().to_string(),
                });
            }
        }
    }

    fn transition(&self, from: ValidationPhase, to: ValidationPhase) {
        tracing::debug!(%from, %to, "phase changed");
        self.events.emit_phase_changed(&PhaseChangedEvent { from, to });
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules.len())
            .field("gates", &self.gates.len())
            .field("threads", &self.pool.current_num_threads())
            .field("tool_timeout", &self.tool_timeout)
            .field("max_file_size", &self.max_file_size)
            .field("root", &self.root)
            .finish()
    }
}
