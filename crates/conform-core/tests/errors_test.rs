//! Tests for error codes and conversions.

use std::path::PathBuf;

use conform_core::errors::*;

#[test]
fn test_error_codes_are_stable() {
    let config = ConfigError::DuplicateRuleId { id: "SRP001".into() };
    assert_eq!(config.error_code(), "CONFIG_ERROR");
    assert_eq!(
        config.coded_string(),
        "[CONFIG_ERROR] Duplicate rule id: SRP001"
    );

    let timeout = ToolExecutionError::Timeout {
        program: "ruff".into(),
        timeout_ms: 5000,
    };
    assert_eq!(timeout.error_code(), "TOOL_TIMEOUT");
    assert_eq!(timeout.program(), "ruff");

    let unreadable = ScanError::BinaryContent {
        path: PathBuf::from("a.bin"),
    };
    assert_eq!(unreadable.error_code(), "UNREADABLE_FILE");

    assert_eq!(PipelineError::Cancelled.error_code(), "CANCELLED");
}

#[test]
fn test_scan_error_from_io_classifies_kind() {
    let path = PathBuf::from("missing.py");
    let not_found = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(
        ScanError::from_io(path.clone(), not_found),
        ScanError::NotFound { .. }
    ));

    let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
    assert!(matches!(
        ScanError::from_io(path.clone(), denied),
        ScanError::PermissionDenied { .. }
    ));

    let other = std::io::Error::new(std::io::ErrorKind::Other, "weird");
    assert!(matches!(ScanError::from_io(path, other), ScanError::Io { .. }));
}

#[test]
fn test_pipeline_error_wraps_subsystems() {
    let err: PipelineError = ConfigError::UnknownDetectorKind {
        rule: "X1".into(),
        kind: "magic".into(),
    }
    .into();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
    assert!(err.to_string().contains("magic"));

    let tool: DetectionError = ToolExecutionError::Failed {
        program: "bandit".into(),
        code: Some(2),
        stderr: "crash".into(),
    }
    .into();
    let err: PipelineError = tool.into();
    assert_eq!(err.error_code(), "TOOL_EXECUTION_ERROR");
}
