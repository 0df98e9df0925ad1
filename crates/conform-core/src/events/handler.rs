//! ConformEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Observer for validation runs.
///
/// Handlers only override the events they care about. `Send + Sync`
/// because file-level events fire from worker threads.
pub trait ConformEventHandler: Send + Sync {
    // ---- Run lifecycle ----
    fn on_validation_started(&self, _event: &ValidationStartedEvent) {}
    fn on_phase_changed(&self, _event: &PhaseChangedEvent) {}
    fn on_validation_complete(&self, _event: &ValidationCompleteEvent) {}

    // ---- Per file ----
    fn on_file_checked(&self, _event: &FileCheckedEvent) {}
    fn on_note_recorded(&self, _event: &NoteRecordedEvent) {}

    // ---- Gates ----
    fn on_gate_evaluated(&self, _event: &GateEvaluatedEvent) {}

    // ---- Errors ----
    fn on_error(&self, _event: &ErrorEvent) {}
}
