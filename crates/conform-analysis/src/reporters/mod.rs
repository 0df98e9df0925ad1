//! Reporters: render a [`ComplianceReport`] for a consumer.
//!
//! Three formats: plain text for terminals, a stable JSON document, and
//! GitHub Actions workflow annotations. Reporters are stateless and never
//! modify the report.

pub mod github;
pub mod json;
pub mod text;

use conform_core::errors::ReportError;

use crate::report::ComplianceReport;

pub use github::GitHubReporter;
pub use json::{parse_json, schema_json, JsonReporter, MetadataDocument, ReportDocument, Summary};
pub use text::TextReporter;

/// Trait for report rendering.
pub trait Reporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, report: &ComplianceReport) -> Result<String, ReportError>;
}

/// Create a reporter by format name. `color` only affects `text`.
pub fn create_reporter(format: &str, color: bool) -> Result<Box<dyn Reporter>, ReportError> {
    match format {
        "text" => Ok(Box::new(TextReporter::new(color))),
        "json" => Ok(Box::new(JsonReporter::default())),
        "github" => Ok(Box::new(GitHubReporter)),
        other => Err(ReportError::UnknownFormat(other.to_string())),
    }
}

/// List all available reporter format names.
pub fn available_formats() -> &'static [&'static str] {
    &["text", "json", "github"]
}

/// Render as plain text without colour.
pub fn to_text(report: &ComplianceReport) -> String {
    TextReporter::new(false).render_string(report)
}

/// Render as JSON without timing.
pub fn to_json(report: &ComplianceReport) -> Result<String, ReportError> {
    JsonReporter::default().render(report)
}
