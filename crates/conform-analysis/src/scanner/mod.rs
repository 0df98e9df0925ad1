//! Scanner subsystem: file classification, path expansion and source loading.

pub mod file_type;
pub mod source;
pub mod walker;

pub use file_type::{classify, FileType};
pub use source::{display_path, read_source, SourceFile};
pub use walker::expand_paths;
