//! Shared constants for the conform validator.

/// conform version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Project configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "conform.toml";

/// User configuration directory name under `$HOME`.
pub const USER_CONFIG_DIR: &str = ".conform";

/// Default rules file, relative to the project root.
pub const DEFAULT_RULES_PATH: &str = ".conform/rules.yaml";

/// Default timeout for a single delegated tool invocation.
pub const DEFAULT_TOOL_TIMEOUT_MS: u64 = 5_000;

/// Maximum file size in bytes that will be validated (default: 1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Default number of worker threads (0 = one per CPU).
pub const DEFAULT_THREADS: usize = 0;

/// Default output format.
pub const DEFAULT_FORMAT: &str = "text";

/// Number of leading bytes inspected for NUL bytes when sniffing binary content.
pub const BINARY_SNIFF_LEN: usize = 8_192;

/// Inline suppression marker.
pub const SUPPRESSION_MARKER: &str = "conform-ignore";

// ---- Process exit codes ----

/// Validation passed.
pub const EXIT_PASS: i32 = 0;

/// Validation failed (blocking violations or a failed gate).
pub const EXIT_FAIL: i32 = 1;

/// Infrastructure error (configuration, tool or I/O failure).
pub const EXIT_INFRA_ERROR: i32 = 2;

/// Validation interrupted by cancellation.
pub const EXIT_CANCELLED: i32 = 130;
