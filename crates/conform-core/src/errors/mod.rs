//! Error handling for conform.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod pipeline_error;
pub mod report_error;
pub mod scan_error;
pub mod tool_error;

pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::ConformErrorCode;
pub use pipeline_error::PipelineError;
pub use report_error::ReportError;
pub use scan_error::ScanError;
pub use tool_error::ToolExecutionError;
