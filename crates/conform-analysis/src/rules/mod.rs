//! Rule registry: rule definitions, loading, lookup and inline suppression.

pub mod loader;
pub mod registry;
pub mod suppression;
pub mod template;
pub mod types;

pub use loader::RuleFormat;
pub use registry::RuleSet;
pub use suppression::SuppressionChecker;
pub use template::TemplateVars;
pub use types::*;
