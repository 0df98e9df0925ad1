//! Stop requests for a validation run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::PipelineError;

/// Polled by the validator between files and between rules.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    /// Raise the stop request. Returns `true` only for the call that
    /// raised it, so a signal handler can tell a repeated Ctrl-C apart.
    fn cancel(&self) -> bool;

    /// `Err(PipelineError::Cancelled)` once a stop was requested.
    fn check(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    requested: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    fn cancel(&self) -> bool {
        !self.requested.swap(true, Ordering::AcqRel)
    }
}
