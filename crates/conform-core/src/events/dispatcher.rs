//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::ConformEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
/// With no handlers registered, `emit` iterates an empty Vec.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ConformEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ConformEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and skipped; later handlers still run.
    fn emit<F: Fn(&dyn ConformEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!("event handler panicked; continuing");
            }
        }
    }

    // ---- Run lifecycle ----
    pub fn emit_validation_started(&self, event: &ValidationStartedEvent) {
        self.emit(|h| h.on_validation_started(event));
    }

    pub fn emit_phase_changed(&self, event: &PhaseChangedEvent) {
        self.emit(|h| h.on_phase_changed(event));
    }

    pub fn emit_validation_complete(&self, event: &ValidationCompleteEvent) {
        self.emit(|h| h.on_validation_complete(event));
    }

    // ---- Per file ----
    pub fn emit_file_checked(&self, event: &FileCheckedEvent) {
        self.emit(|h| h.on_file_checked(event));
    }

    pub fn emit_note_recorded(&self, event: &NoteRecordedEvent) {
        self.emit(|h| h.on_note_recorded(event));
    }

    // ---- Gates ----
    pub fn emit_gate_evaluated(&self, event: &GateEvaluatedEvent) {
        self.emit(|h| h.on_gate_evaluated(event));
    }

    // ---- Errors ----
    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
