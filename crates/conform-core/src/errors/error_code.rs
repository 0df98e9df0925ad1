//! ConformErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured error code
/// that CI integrations can match on without parsing messages.
pub trait ConformErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SCAN_ERROR: &str = "SCAN_ERROR";
pub const UNREADABLE_FILE: &str = "UNREADABLE_FILE";
pub const TOOL_EXECUTION_ERROR: &str = "TOOL_EXECUTION_ERROR";
pub const TOOL_TIMEOUT: &str = "TOOL_TIMEOUT";
pub const DETECTION_ERROR: &str = "DETECTION_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
pub const CANCELLED: &str = "CANCELLED";
pub const IO_ERROR: &str = "IO_ERROR";
