//! Logging for conform.
//! `tracing` with an `EnvFilter` driven by `CONFORM_LOG`.

pub mod setup;

pub use setup::{init_tracing, LOG_ENV_VAR};
