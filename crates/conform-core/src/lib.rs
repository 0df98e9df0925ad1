//! # conform-core
//!
//! Shared foundation for the conform workspace: error types, layered
//! configuration, cancellation, lifecycle events and tracing setup.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
