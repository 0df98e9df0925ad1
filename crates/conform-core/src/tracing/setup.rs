//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-target filter directives.
pub const LOG_ENV_VAR: &str = "CONFORM_LOG";

/// Initialize the tracing subscriber.
///
/// Reads `CONFORM_LOG` for directives, e.g.
/// `CONFORM_LOG=conform_analysis::detectors=debug,warn`.
/// Falls back to `warn` when unset or invalid. Output goes to stderr so
/// stdout stays reserved for reports.
///
/// Idempotent; later calls are no-ops. Also a no-op when another global
/// subscriber is already installed.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
