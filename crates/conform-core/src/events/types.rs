//! Event payload types.

use std::fmt;
use std::path::PathBuf;

/// Phases of one validation run, in order.
/// A run that fails while `Loading` never reaches `Classifying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationPhase {
    Idle,
    Loading,
    Classifying,
    Detecting,
    Aggregating,
    Done,
}

impl ValidationPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Classifying => "classifying",
            Self::Detecting => "detecting",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload for `on_validation_started`.
#[derive(Debug, Clone)]
pub struct ValidationStartedEvent {
    pub file_count: usize,
    pub rule_count: usize,
    pub strict: bool,
}

/// Payload for `on_phase_changed`.
#[derive(Debug, Clone)]
pub struct PhaseChangedEvent {
    pub from: ValidationPhase,
    pub to: ValidationPhase,
}

/// Payload for `on_file_checked`.
#[derive(Debug, Clone)]
pub struct FileCheckedEvent {
    pub path: PathBuf,
    pub file_type: String,
    pub rules_applied: usize,
    pub violations: usize,
}

/// Payload for `on_note_recorded`.
#[derive(Debug, Clone)]
pub struct NoteRecordedEvent {
    pub kind: String,
    pub file_path: Option<String>,
    pub rule_id: Option<String>,
    pub message: String,
}

/// Payload for `on_gate_evaluated`.
#[derive(Debug, Clone)]
pub struct GateEvaluatedEvent {
    pub gate_name: String,
    pub passed: bool,
    pub message: String,
}

/// Payload for `on_validation_complete`.
#[derive(Debug, Clone)]
pub struct ValidationCompleteEvent {
    pub status: String,
    pub violations: usize,
    pub files_checked: usize,
    pub duration_ms: u64,
    pub cancelled: bool,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
