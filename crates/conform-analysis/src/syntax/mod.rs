//! Syntax outline: functions and classes of a source file, extracted
//! from a tree-sitter parse. Feeds the pattern detector and the
//! built-in metrics.

mod languages;
mod outline;

pub use outline::{build_outline, ClassInfo, FunctionInfo, Outline};

/// Placeholder name for functions without an identifier.
pub const ANONYMOUS: &str = "<anonymous>";
