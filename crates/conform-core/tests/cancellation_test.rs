//! Tests for the cancellation token.

use conform_core::errors::{ConformErrorCode, PipelineError};
use conform_core::traits::{Cancellable, CancellationToken};
use rayon::prelude::*;

#[test]
fn test_token_starts_clear() {
    let token = CancellationToken::new();
    assert!(!token.is_cancelled());
    assert!(token.check().is_ok());
}

#[test]
fn test_clones_share_state() {
    let token = CancellationToken::default();
    let handle = token.clone();
    handle.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn test_only_first_cancel_reports_raising() {
    let token = CancellationToken::new();
    assert!(token.cancel());
    assert!(!token.cancel());
    assert!(!token.clone().cancel());
}

#[test]
fn test_check_reports_cancelled_code() {
    let token = CancellationToken::new();
    token.cancel();
    let err = token.check().unwrap_err();
    assert!(matches!(err, PipelineError::Cancelled));
    assert_eq!(err.error_code(), "CANCELLED");
}

#[test]
fn test_cancel_visible_across_threads() {
    let token = CancellationToken::new();
    let worker = token.clone();
    std::thread::spawn(move || worker.cancel()).join().unwrap();
    assert!(token.is_cancelled());
}

#[test]
fn test_parallel_workers_stop_after_cancel() {
    let token = CancellationToken::new();
    let processed: Vec<usize> = (0..1000usize)
        .into_par_iter()
        .with_max_len(1)
        .filter_map(|i| {
            if i == 10 {
                token.cancel();
            }
            if token.is_cancelled() {
                None
            } else {
                Some(i)
            }
        })
        .collect();
    assert!(token.is_cancelled());
    assert!(processed.len() < 1000);
}
